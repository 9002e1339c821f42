//! Literal substring containment of query tokens. Has no optional
//! dependency, so it is the signal ranking falls back to.

use super::{Signal, SignalInput, SignalKind};

#[derive(Debug, Clone, Copy)]
pub struct KeywordSignal {
    weight: f32,
}

impl KeywordSignal {
    #[must_use]
    pub const fn new(weight: f32) -> Self {
        Self { weight }
    }
}

impl Signal for KeywordSignal {
    fn kind(&self) -> SignalKind {
        SignalKind::Keyword
    }

    fn score(&self, input: &SignalInput<'_>) -> Vec<f32> {
        let tokens = query_tokens(input.query);
        input
            .records
            .iter()
            .map(|record| {
                let haystack = record.composite_text().to_lowercase();
                self.weight * count_hits(&tokens, &haystack)
            })
            .collect()
    }
}

/// Number of whitespace tokens of `query` longer than one character that
/// occur, ignoring case, somewhere in `text`. Repeated tokens count once per
/// repetition.
#[must_use]
pub fn keyword_hits(query: &str, text: &str) -> f32 {
    count_hits(&query_tokens(query), &text.to_lowercase())
}

fn query_tokens(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .map(str::to_lowercase)
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn count_hits(tokens: &[String], haystack: &str) -> f32 {
    tokens
        .iter()
        .filter(|token| haystack.contains(token.as_str()))
        .count() as f32
}

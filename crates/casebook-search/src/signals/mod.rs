//! Independent relevance signals.
//!
//! Each signal maps a query onto one weighted score per corpus record, in
//! corpus order. Signals never fail: an unavailable signal returns zeros and
//! the blend proceeds on whatever remains.

mod fuzzy;
mod keyword;
mod vector;

pub use fuzzy::{FuzzySignal, token_set_ratio};
pub use keyword::{KeywordSignal, keyword_hits};
pub use vector::VectorSignal;

use casebook_core::capabilities::Capabilities;
use casebook_core::config::SearchWeights;
use casebook_core::model::CaseRecord;
use serde::Serialize;

use crate::lexical::LexicalIndex;

/// Everything a signal may read during one ranking pass.
#[derive(Debug, Clone, Copy)]
pub struct SignalInput<'a> {
    /// Query exactly as typed.
    pub query: &'a str,
    /// Query with synonym expansions appended.
    pub expanded_query: &'a str,
    pub records: &'a [CaseRecord],
    pub index: Option<&'a LexicalIndex>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Vector,
    Fuzzy,
    Keyword,
}

/// A relevance signal contributing to the blended score.
pub trait Signal: Send + Sync {
    fn kind(&self) -> SignalKind;

    /// Weighted score per record, same length and order as `input.records`.
    fn score(&self, input: &SignalInput<'_>) -> Vec<f32>;
}

/// Weighted scores produced by one signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalScores {
    pub kind: SignalKind,
    pub values: Vec<f32>,
}

/// The fixed vector + fuzzy + keyword scorer set.
pub struct SignalSet {
    signals: Vec<Box<dyn Signal>>,
}

impl SignalSet {
    #[must_use]
    pub fn new(weights: SearchWeights, capabilities: Capabilities) -> Self {
        Self {
            signals: vec![
                Box::new(VectorSignal::new(weights.vector)),
                Box::new(FuzzySignal::new(
                    weights.fuzzy_topic,
                    weights.fuzzy_cause,
                    capabilities.fuzzy,
                )),
                Box::new(KeywordSignal::new(weights.keyword)),
            ],
        }
    }

    /// Run every signal over the same input.
    #[must_use]
    pub fn score_all(&self, input: &SignalInput<'_>) -> Vec<SignalScores> {
        self.signals
            .iter()
            .map(|signal| SignalScores {
                kind: signal.kind(),
                values: signal.score(input),
            })
            .collect()
    }
}

impl std::fmt::Debug for SignalSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.signals.iter().map(|s| s.kind()))
            .finish()
    }
}

use super::{Signal, SignalInput, SignalKind};

/// Cosine similarity of the expanded query against each record's composite
/// text in the char n-gram TF-IDF space.
#[derive(Debug, Clone, Copy)]
pub struct VectorSignal {
    weight: f32,
}

impl VectorSignal {
    #[must_use]
    pub const fn new(weight: f32) -> Self {
        Self { weight }
    }
}

impl Signal for VectorSignal {
    fn kind(&self) -> SignalKind {
        SignalKind::Vector
    }

    fn score(&self, input: &SignalInput<'_>) -> Vec<f32> {
        let Some(index) = input.index else {
            return vec![0.0; input.records.len()];
        };

        let mut sims = index.similarities(input.expanded_query);
        // An index from another snapshot would misalign scores; treat as absent.
        if sims.len() != input.records.len() {
            tracing::warn!(
                index_docs = sims.len(),
                records = input.records.len(),
                "lexical index does not match corpus, vector signal disabled"
            );
            return vec![0.0; input.records.len()];
        }
        for s in &mut sims {
            *s *= self.weight;
        }
        sims
    }
}

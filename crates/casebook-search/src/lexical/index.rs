//! Character n-gram TF-IDF vector space over case composite texts.
//!
//! Weighting follows the usual smoothed scheme:
//!
//! ```text
//! idf(t)   = ln((1 + N) / (1 + df(t))) + 1
//! w(t, d)  = tf(t, d) * idf(t), then L2-normalized per document
//! ```
//!
//! Because every stored vector is unit length, cosine similarity against a
//! query is a sparse dot product with the (also normalized) query vector.
//! Query n-grams absent from the corpus vocabulary are ignored.

use std::collections::HashMap;

use casebook_core::capabilities::Capabilities;
use tracing::debug;

use super::ngram::char_wb_ngrams;

/// Sparse vector as `(term id, weight)` pairs sorted by term id.
pub type SparseVector = Vec<(usize, f32)>;

/// Read-only TF-IDF model for one corpus snapshot.
#[derive(Debug, Clone)]
pub struct LexicalIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    docs: Vec<SparseVector>,
}

impl LexicalIndex {
    /// Build the index, or `None` when the vector signal is disabled or the
    /// corpus is empty. `None` is not an error: it means "no vector signal".
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn build<'a, I>(texts: I, capabilities: Capabilities) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !capabilities.vector {
            debug!("vector capability disabled, skipping lexical index");
            return None;
        }

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<u32> = Vec::new();
        let mut counts: Vec<HashMap<usize, u32>> = Vec::new();
        let mut grams = Vec::new();

        for text in texts {
            grams.clear();
            char_wb_ngrams(text, &mut grams);

            let mut tf: HashMap<usize, u32> = HashMap::new();
            for gram in grams.drain(..) {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(gram).or_insert(next_id);
                if id == doc_freq.len() {
                    doc_freq.push(0);
                }
                *tf.entry(id).or_insert(0) += 1;
            }
            for id in tf.keys() {
                doc_freq[*id] += 1;
            }
            counts.push(tf);
        }

        if counts.is_empty() {
            return None;
        }

        let n_docs = counts.len() as f32;
        let idf: Vec<f32> = doc_freq
            .iter()
            .map(|df| ((1.0 + n_docs) / (1.0 + *df as f32)).ln() + 1.0)
            .collect();

        let docs = counts
            .iter()
            .map(|tf| weigh(tf.iter().map(|(id, c)| (*id, *c)), &idf))
            .collect();

        debug!(
            docs = counts.len(),
            terms = vocabulary.len(),
            "lexical index built"
        );

        Some(Self {
            vocabulary,
            idf,
            docs,
        })
    }

    /// Number of indexed documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Number of distinct n-grams in the vocabulary.
    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Project `text` into the index's vector space.
    #[must_use]
    pub fn vectorize(&self, text: &str) -> SparseVector {
        let mut grams = Vec::new();
        char_wb_ngrams(text, &mut grams);

        let mut tf: HashMap<usize, u32> = HashMap::new();
        for gram in &grams {
            if let Some(id) = self.vocabulary.get(gram) {
                *tf.entry(*id).or_insert(0) += 1;
            }
        }
        weigh(tf.into_iter(), &self.idf)
    }

    /// Cosine similarity of `text` against every document, in corpus order.
    #[must_use]
    pub fn similarities(&self, text: &str) -> Vec<f32> {
        let query: HashMap<usize, f32> = self.vectorize(text).into_iter().collect();
        if query.is_empty() {
            return vec![0.0; self.docs.len()];
        }
        self.docs
            .iter()
            .map(|doc| {
                doc.iter()
                    .filter_map(|(id, w)| query.get(id).map(|q| q * w))
                    .sum::<f32>()
                    .clamp(0.0, 1.0)
            })
            .collect()
    }
}

/// TF × IDF, L2-normalized, sorted by term id.
#[allow(clippy::cast_precision_loss)]
fn weigh(tf: impl Iterator<Item = (usize, u32)>, idf: &[f32]) -> SparseVector {
    let mut vector: SparseVector = tf.map(|(id, c)| (id, c as f32 * idf[id])).collect();
    vector.sort_unstable_by_key(|(id, _)| *id);

    let norm = vector.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm <= f32::EPSILON {
        return Vec::new();
    }
    for (_, w) in &mut vector {
        *w /= norm;
    }
    vector
}

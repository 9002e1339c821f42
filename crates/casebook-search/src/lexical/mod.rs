//! Lexical vector space: char n-gram TF-IDF index and its fingerprint cache.

mod cache;
mod index;
pub mod ngram;

pub use cache::IndexCache;
pub use index::{LexicalIndex, SparseVector};

//! Score fusion: weighted signal sum, threshold, stable ordering.

mod blend;

pub use blend::{ScoredCase, blend, threshold};

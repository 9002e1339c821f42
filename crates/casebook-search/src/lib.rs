#![forbid(unsafe_code)]
//! casebook-search library.
//!
//! Hybrid ranking of historical repair cases against a free-text fault
//! description: synonym expansion, three independent signals (char n-gram
//! TF-IDF cosine, fuzzy token-set ratio, keyword containment), a weighted
//! blend with threshold and stable ordering, and best-evidence selection.
//!
//! # Conventions
//!
//! - **Errors**: Ranking is infallible; missing capabilities degrade to zero
//!   scores instead of failing.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod engine;
pub mod evidence;
pub mod expand;
pub mod fusion;
pub mod lexical;
pub mod signals;

pub use engine::{RankOutcome, RankingEngine, rank};
pub use lexical::IndexCache;

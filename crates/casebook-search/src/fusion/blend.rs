//! Linear blend of weighted signal scores.
//!
//! Signals arrive already weighted, so the blended score is their elementwise
//! sum:
//!
//! ```text
//! final = vector + fuzzy + keyword
//! ```
//!
//! Ordering is descending by `final_score`. Equal scores keep corpus order,
//! which usually reflects recency or manual curation.

use casebook_core::model::CaseRecord;
use serde::Serialize;

use crate::signals::{SignalKind, SignalScores};

/// A case with its blended score and the contribution of each signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCase<'a> {
    pub record: &'a CaseRecord,
    pub final_score: f32,
    pub vector_score: f32,
    pub fuzzy_score: f32,
    pub keyword_score: f32,
}

/// Sum the signal vectors into one [`ScoredCase`] per record, in corpus order.
///
/// A signal vector shorter than `records` contributes zero for the missing
/// positions.
#[must_use]
pub fn blend<'a>(records: &'a [CaseRecord], signals: &[SignalScores]) -> Vec<ScoredCase<'a>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let mut scored = ScoredCase {
                record,
                final_score: 0.0,
                vector_score: 0.0,
                fuzzy_score: 0.0,
                keyword_score: 0.0,
            };
            for signal in signals {
                let value = signal.values.get(i).copied().unwrap_or(0.0);
                match signal.kind {
                    SignalKind::Vector => scored.vector_score += value,
                    SignalKind::Fuzzy => scored.fuzzy_score += value,
                    SignalKind::Keyword => scored.keyword_score += value,
                }
                scored.final_score += value;
            }
            scored
        })
        .collect()
}

/// Keep cases scoring strictly above `min_score`, best first, at most
/// `max_results` of them.
#[must_use]
pub fn threshold(scored: Vec<ScoredCase<'_>>, min_score: f32, max_results: usize) -> Vec<ScoredCase<'_>> {
    let mut kept: Vec<ScoredCase<'_>> = scored
        .into_iter()
        .filter(|case| case.final_score > min_score)
        .collect();
    // `sort_by` is stable: ties stay in corpus order.
    kept.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    kept.truncate(max_results);
    kept
}

//! Best-evidence selection and display cleanup.

use casebook_core::model::CaseRecord;

use crate::fusion::ScoredCase;

/// Cause values that carry no diagnostic information.
pub const PLACEHOLDER_CAUSES: [&str; 5] = ["無", "待處理", "未知", "nan", ""];

/// Minimum trimmed length, in characters, of a cause worth citing.
const MIN_INFORMATIVE_CAUSE_CHARS: usize = 3;

/// Whether `cause` is long enough and not a placeholder.
#[must_use]
pub fn is_informative_cause(cause: &str) -> bool {
    let trimmed = cause.trim();
    trimmed.chars().count() >= MIN_INFORMATIVE_CAUSE_CHARS && !PLACEHOLDER_CAUSES.contains(&trimmed)
}

/// Pick the record that backs the summary: the first in rank order with an
/// informative cause, else the top-ranked record. `None` only when `ranked`
/// is empty.
#[must_use]
pub fn select_best_evidence<'a>(ranked: &[ScoredCase<'a>]) -> Option<&'a CaseRecord> {
    ranked
        .iter()
        .find(|case| is_informative_cause(case.record.cause()))
        .or_else(|| ranked.first())
        .map(|case| case.record)
}

/// Strip markdown bold markers and fold newlines into spaces.
#[must_use]
pub fn clean_text(text: &str) -> String {
    text.replace("**", "")
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}

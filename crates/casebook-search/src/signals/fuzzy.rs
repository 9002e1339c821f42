//! Order-independent token overlap between the raw query and a case's
//! topic and cause fields.

use std::collections::BTreeSet;

use super::{Signal, SignalInput, SignalKind};

#[derive(Debug, Clone, Copy)]
pub struct FuzzySignal {
    topic_weight: f32,
    cause_weight: f32,
    enabled: bool,
}

impl FuzzySignal {
    #[must_use]
    pub const fn new(topic_weight: f32, cause_weight: f32, enabled: bool) -> Self {
        Self {
            topic_weight,
            cause_weight,
            enabled,
        }
    }
}

impl Signal for FuzzySignal {
    fn kind(&self) -> SignalKind {
        SignalKind::Fuzzy
    }

    fn score(&self, input: &SignalInput<'_>) -> Vec<f32> {
        if !self.enabled {
            return vec![0.0; input.records.len()];
        }
        input
            .records
            .iter()
            .map(|record| {
                self.topic_weight * token_set_ratio(input.query, record.topic())
                    + self.cause_weight * token_set_ratio(input.query, record.cause())
            })
            .collect()
    }
}

/// Token-set similarity of `a` and `b` in `[0, 1]`.
///
/// Both strings are split on whitespace into token sets. The score is the
/// best normalized Indel similarity among three comparisons: the two sorted
/// set differences against each other, and the shared tokens against the
/// shared tokens plus either difference. A string with no tokens scores 0.
/// When one set contains the other the score is 1. Matching is
/// case-sensitive.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn token_set_ratio(a: &str, b: &str) -> f32 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 1.0;
    }

    // BTreeSet iteration is already sorted.
    let diff_ab_joined: Vec<char> = diff_ab.join(" ").chars().collect();
    let diff_ba_joined: Vec<char> = diff_ba.join(" ").chars().collect();
    let ab_len = diff_ab_joined.len();
    let ba_len = diff_ba_joined.len();
    let sect_len = intersection.join(" ").chars().count();

    let mut best = normalized_indel(&diff_ab_joined, &diff_ba_joined);
    if sect_len == 0 {
        return best;
    }

    // "sect" vs "sect diff": the distance is the separator plus the diff.
    for diff_len in [ab_len, ba_len] {
        let dist = diff_len + 1;
        let total = 2 * sect_len + dist;
        let ratio = 1.0 - dist as f32 / total as f32;
        best = best.max(ratio);
    }
    best
}

/// `1 - indel_distance / (len_a + len_b)`, where the Indel distance counts
/// insertions and deletions only.
#[allow(clippy::cast_precision_loss)]
fn normalized_indel(a: &[char], b: &[char]) -> f32 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let distance = total - 2 * lcs_len(a, b);
    1.0 - distance as f32 / total as f32
}

/// Length of the longest common subsequence, two-row dynamic programming.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

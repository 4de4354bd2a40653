//! EVA ranking
//!
//! Ordering is descending by score and STABLE: records with equal scores keep
//! their input order. `slice::sort_by` is a stable merge sort, so ties are
//! never reshuffled; do not swap it for `sort_unstable_by`.

use crate::{Signal, SignalScore};

/// Pair every signal with its score (computed once) and sort descending
fn ranked(signals: &[Signal]) -> Vec<(&Signal, f64)> {
    let mut scored: Vec<(&Signal, f64)> = signals.iter().map(|s| (s, s.eva())).collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

/// (id, score) pairs, highest EVA first
pub fn score_signals(signals: &[Signal]) -> Vec<SignalScore> {
    ranked(signals)
        .into_iter()
        .map(|(s, score)| SignalScore {
            id: s.id.clone(),
            score,
        })
        .collect()
}

/// Signals ordered by EVA, optionally truncated to the first `top_k`.
///
/// A negative `top_k` yields an empty result; one larger than the batch
/// returns everything.
pub fn prioritize(signals: &[Signal], top_k: Option<i64>) -> Vec<Signal> {
    let limit = match top_k {
        Some(k) => usize::try_from(k.max(0)).unwrap_or(usize::MAX),
        None => usize::MAX,
    };

    ranked(signals)
        .into_iter()
        .take(limit)
        .map(|(s, _)| s.clone())
        .collect()
}

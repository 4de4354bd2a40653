//! Expected Value of Attention
//!
//! EVA = (probability_useful × impact) / time_cost
//!
//! Higher EVA means more expected value per minute of attention spent.
//! No upper clamp is applied; a time cost near the floor yields very large scores.

use serde::{Deserialize, Serialize};

use crate::Signal;

/// An (id, score) pair produced by scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalScore {
    pub id: String,
    pub score: f64,
}

/// Compute the EVA score of a validated signal
pub fn eva(signal: &Signal) -> f64 {
    // time_cost > 0 is guaranteed by validation
    (signal.probability_useful() * signal.impact()) / signal.time_cost()
}

impl Signal {
    pub fn eva(&self) -> f64 {
        eva(self)
    }
}

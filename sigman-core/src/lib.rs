//! Sigman Core - Signal records and attention-economics policy
//!
//! This crate provides the pure, synchronous primitives:
//! - Signal records with validated attention fields
//! - Expected Value of Attention (EVA) scoring
//! - Source allow-list and pattern filters
//! - Stable EVA ranking with top-k truncation
//! - Uniform sampling without replacement

pub mod signals;
pub mod eva;
pub mod filter;
pub mod ranking;
pub mod sampler;

pub use signals::*;
pub use eva::*;
pub use filter::*;
pub use ranking::*;
pub use sampler::*;

/// Default estimated attention cost (minutes)
pub const DEFAULT_TIME_COST: f64 = 1.0;

/// Default probability that a signal is useful
pub const DEFAULT_PROBABILITY_USEFUL: f64 = 0.5;

/// Default impact if useful
pub const DEFAULT_IMPACT: f64 = 1.0;

/// Floor applied to zero (or smaller) time costs after validation
pub const MIN_TIME_COST: f64 = 1e-6;

/// Maximum impact
pub const MAX_IMPACT: f64 = 10.0;

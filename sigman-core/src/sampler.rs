//! Uniform sampling without replacement
//!
//! Used to build a "noise reservoir": a random slice of incoming signals kept
//! aside to audit how many useful signals the filters throw away.

use rand::seq::index;
use rand::Rng;
use thiserror::Error;

use crate::Signal;

/// Errors from sample size validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("sample_size must be non-negative, got {0}")]
    Negative(i64),

    #[error("sample_size {requested} cannot exceed the number of provided signals ({available})")]
    TooLarge { requested: i64, available: usize },
}

/// Check a requested sample size against the batch length.
///
/// An empty batch accepts any non-negative size (the sample is empty).
pub fn check_sample_size(available: usize, sample_size: i64) -> Result<usize, SampleError> {
    if sample_size < 0 {
        return Err(SampleError::Negative(sample_size));
    }

    let requested = usize::try_from(sample_size).unwrap_or(usize::MAX);
    if available > 0 && requested > available {
        return Err(SampleError::TooLarge {
            requested: sample_size,
            available,
        });
    }

    Ok(requested)
}

/// Sample with the calling thread's generator.
pub fn sample(signals: &[Signal], sample_size: i64) -> Result<Vec<Signal>, SampleError> {
    sample_with(signals, sample_size, &mut rand::thread_rng())
}

/// Sample with an explicit generator. Output is in draw order.
///
/// The size is checked with [`check_sample_size`] before anything is drawn.
pub fn sample_with<R: Rng + ?Sized>(
    signals: &[Signal],
    sample_size: i64,
    rng: &mut R,
) -> Result<Vec<Signal>, SampleError> {
    let amount = check_sample_size(signals.len(), sample_size)?;
    if amount == 0 || signals.is_empty() {
        return Ok(Vec::new());
    }

    Ok(index::sample(rng, signals.len(), amount)
        .into_iter()
        .map(|i| signals[i].clone())
        .collect())
}

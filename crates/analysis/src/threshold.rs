//! Smoothed z-score signal detection.

use contracts::ContractError;

use crate::stats::{mean, stddev};
use crate::view::FieldView;

/// Flag samples deviating more than `threshold` standard deviations from the
/// running mean of the previous `lag` filtered samples
///
/// Flagged samples enter the filtered series as
/// `influence * raw + (1 - influence) * previous`. Series not longer than
/// `lag` are all zeros.
///
/// # Errors
/// - `lag` is zero
pub fn thresholding<T>(
    view: &FieldView<'_, T>,
    lag: usize,
    threshold: f64,
    influence: f64,
) -> Result<Vec<i8>, ContractError> {
    if lag == 0 {
        return Err(ContractError::invalid_argument("lag", "lag must be > 0"));
    }
    let n = view.len();
    let mut signals = vec![0i8; n];
    if n <= lag {
        return Ok(signals);
    }

    let raw = view.values();
    let mut filtered = raw.clone();
    let mut avg = mean(&raw[..lag])?;
    let mut std = stddev(&raw[..lag])?;

    for i in lag..n {
        let y = raw[i];
        if (y - avg).abs() > threshold * std {
            signals[i] = if y > avg { 1 } else { -1 };
            filtered[i] = influence * y + (1.0 - influence) * filtered[i - 1];
        }
        let window = &filtered[i + 1 - lag..=i];
        avg = mean(window)?;
        std = stddev(window)?;
    }
    Ok(signals)
}

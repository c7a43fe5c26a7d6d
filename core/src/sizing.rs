//! Worker-pool sizing.
//!
//! `cores × utilization × (1 + wait / compute)`: the more time a task spends
//! blocked relative to computing, the more workers are worth running.

use lanprobe_common::error::SizingError;

/// Pool size for this machine's core count.
pub fn compute_size(
    target_utilization: f64,
    wait_time: f64,
    compute_time: f64,
) -> Result<usize, SizingError> {
    compute_size_for(num_cpus::get(), target_utilization, wait_time, compute_time)
}

/// Pool size for an explicit core count.
///
/// Fractional sizes round down, never up: 4 cores at `0.9`, `1000 / 2` give
/// `1803.6` and yield 1803. The result is never below one.
pub fn compute_size_for(
    cores: usize,
    target_utilization: f64,
    wait_time: f64,
    compute_time: f64,
) -> Result<usize, SizingError> {
    // Negated comparisons so NaN is rejected as well.
    if !(compute_time > 0.0) {
        return Err(SizingError::NonPositiveComputeTime(compute_time));
    }
    if !(target_utilization > 0.0 && target_utilization <= 1.0) {
        return Err(SizingError::InvalidUtilization(target_utilization));
    }
    if !(wait_time >= 0.0) {
        return Err(SizingError::NegativeWaitTime(wait_time));
    }

    let size = cores as f64 * target_utilization * (1.0 + wait_time / compute_time);
    Ok((size.floor() as usize).max(1))
}

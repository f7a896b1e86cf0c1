//! Indicator implementations.
//!
//! Indicators are pure functions: close history in, series of the same length
//! out. Warmup positions are `None`, never a NaN sentinel, so callers must
//! decide explicitly what an undefined value means for them.

pub mod rolling_mean;

pub use rolling_mean::RollingMean;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

//! Close-above-mean signal and its rate.
//!
//! A position signals when its close is strictly above its rolling mean.
//! Positions without a defined mean never signal: a breakout above an
//! unknown baseline cannot be asserted.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::ComputeError;

/// Derive the boolean signal series pointwise.
///
/// `close` and `mean` must have the same length; the output has that length too.
pub fn derive_signals(close: &[f64], mean: &[Option<f64>]) -> Vec<bool> {
    debug_assert_eq!(close.len(), mean.len(), "series length mismatch");
    close
        .iter()
        .zip(mean)
        .map(|(&c, &m)| m.is_some_and(|m| c > m))
        .collect()
}

/// Reduce a signal series to the fraction of positions that signal.
///
/// An empty series is an error, never a rate of 0.
pub fn reduce_signals(signals: &[bool]) -> Result<SignalRate, ComputeError> {
    let hits = signals.iter().filter(|&&s| s).count();
    SignalRate::from_counts(hits, signals.len())
}

/// Fraction of signalling positions, held exactly at 4 decimal places.
///
/// Stored as an integer count of 1/10_000 units. Rounding is
/// round-half-to-even, computed in integer arithmetic on `hits * 10_000 / total`
/// so the 4th decimal never depends on binary floating-point error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SignalRate {
    units: u32,
}

impl SignalRate {
    /// Units per 1.0.
    pub const SCALE: u32 = 10_000;

    pub const ZERO: SignalRate = SignalRate { units: 0 };

    pub fn from_counts(hits: usize, total: usize) -> Result<Self, ComputeError> {
        if total == 0 {
            return Err(ComputeError::EmptySeries);
        }
        if hits > total {
            return Err(ComputeError::InvalidCounts { hits, total });
        }

        let numerator = hits as u128 * u128::from(Self::SCALE);
        let denominator = total as u128;
        let quotient = numerator / denominator;
        let remainder = numerator % denominator;

        let rounded = match (remainder * 2).cmp(&denominator) {
            Ordering::Less => quotient,
            Ordering::Greater => quotient + 1,
            Ordering::Equal => quotient + (quotient & 1),
        };

        // hits <= total bounds the quotient by SCALE.
        Ok(Self {
            units: rounded as u32,
        })
    }

    /// Rate in 1/10_000 units, in `0..=10_000`.
    pub fn units(&self) -> u32 {
        self.units
    }

    /// Rate as a float in `[0, 1]`, the nearest f64 to the 4-decimal value.
    pub fn value(&self) -> f64 {
        f64::from(self.units) / f64::from(Self::SCALE)
    }
}

impl fmt::Display for SignalRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:04}",
            self.units / Self::SCALE,
            self.units % Self::SCALE
        )
    }
}

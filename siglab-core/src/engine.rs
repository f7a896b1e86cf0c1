//! SignalEngine: rolling mean, signal derivation, and rate reduction.
//!
//! `run()` is the only entry point. It expects:
//! - a validated, non-empty close series (the loader rejects empty tables;
//!   the engine checks again before dividing)
//! - a `SeededRng` that the caller has already built from the job's seed
//!
//! Latency covers the rolling mean, the signal derivation and the reduction,
//! nothing else, and is reported floor-truncated to whole milliseconds.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::domain::CloseSeries;
use crate::indicators::RollingMean;
use crate::rng::SeededRng;
use crate::signal::{derive_signals, reduce_signals, SignalRate};

/// Arithmetic faults not already classified as data errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputeError {
    #[error("window must be a positive integer")]
    InvalidWindow,
    #[error("cannot compute a signal rate over an empty close series")]
    EmptySeries,
    #[error("signal count {hits} exceeds series length {total}")]
    InvalidCounts { hits: usize, total: usize },
}

/// Everything one computation produced.
#[derive(Debug, Clone)]
pub struct SignalOutcome {
    /// Rows the rate was computed over.
    pub rows: usize,
    pub window: usize,
    /// Seed of the generator the computation ran with.
    pub seed: i64,
    pub rolling_mean: Vec<Option<f64>>,
    pub signals: Vec<bool>,
    /// Number of `true` entries in `signals`.
    pub hits: usize,
    pub rate: SignalRate,
    pub latency: Duration,
}

impl SignalOutcome {
    /// Computation latency in whole milliseconds (floor).
    pub fn latency_ms(&self) -> u64 {
        u64::try_from(self.latency.as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone)]
pub struct SignalEngine {
    mean: RollingMean,
}

impl SignalEngine {
    pub fn new(window: usize) -> Result<Self, ComputeError> {
        Ok(Self {
            mean: RollingMean::new(window)?,
        })
    }

    pub fn window(&self) -> usize {
        self.mean.window()
    }

    /// Compute the signal rate of `close`.
    ///
    /// `rng` carries the job's seed; the current computation draws nothing
    /// from it, but any randomized step added here must use it.
    pub fn run(
        &self,
        close: &CloseSeries,
        rng: &mut SeededRng,
    ) -> Result<SignalOutcome, ComputeError> {
        if close.is_empty() {
            return Err(ComputeError::EmptySeries);
        }

        let started = Instant::now();

        let values = close.as_slice();
        let rolling_mean = self.mean.compute(values);
        let signals = derive_signals(values, &rolling_mean);
        let rate = reduce_signals(&signals)?;

        let latency = started.elapsed();
        let hits = signals.iter().filter(|&&s| s).count();

        Ok(SignalOutcome {
            rows: close.len(),
            window: self.window(),
            seed: rng.seed(),
            rolling_mean,
            signals,
            hits,
            rate,
            latency,
        })
    }
}

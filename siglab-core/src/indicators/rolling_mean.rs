//! Rolling mean (trailing simple moving average).
//!
//! Mean of the `window` values ending at each position, inclusive.
//! Lookback: window - 1 (first defined value at index window-1).
//! No centering, no forward-looking window.

use crate::engine::ComputeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingMean {
    window: usize,
    name: String,
}

impl RollingMean {
    pub fn new(window: usize) -> Result<Self, ComputeError> {
        if window == 0 {
            return Err(ComputeError::InvalidWindow);
        }
        Ok(Self {
            window,
            name: format!("rolling_mean_{window}"),
        })
    }

    /// Human-readable name (e.g. "rolling_mean_20").
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of leading positions without enough history.
    pub fn lookback(&self) -> usize {
        self.window - 1
    }

    /// Compute the rolling mean for the whole series.
    ///
    /// Returns a `Vec` of the same length as `values`; the first `lookback()`
    /// entries (or all of them, when the series is shorter than the window)
    /// are `None`.
    ///
    /// Single pass: one running sum is rolled forward (add the entering value,
    /// subtract the leaving one) with Neumaier compensation, and rebuilt from
    /// scratch once every `window` positions. A window whose sum overflows is
    /// averaged from scaled values instead.
    pub fn compute(&self, values: &[f64]) -> Vec<Option<f64>> {
        let w = self.window;
        let mut result = Vec::with_capacity(values.len());
        result.extend(std::iter::repeat(None).take(self.lookback().min(values.len())));
        if values.len() < w {
            return result;
        }

        let divisor = w as f64;
        let mut sum = WindowSum::of(&values[..w]);
        result.push(Some(sum.mean(&values[..w], divisor)));

        for end in (w + 1)..=values.len() {
            let window = &values[end - w..end];
            if (end - w) % w == 0 || !sum.is_finite() {
                sum = WindowSum::of(window);
            } else {
                sum.add(values[end - 1]);
                sum.add(-values[end - w - 1]);
            }
            result.push(Some(sum.mean(window, divisor)));
        }
        result
    }
}

/// Neumaier-compensated running sum.
#[derive(Debug, Clone, Copy, Default)]
struct WindowSum {
    sum: f64,
    compensation: f64,
}

impl WindowSum {
    fn of(values: &[f64]) -> Self {
        let mut s = Self::default();
        for &v in values {
            s.add(v);
        }
        s
    }

    fn add(&mut self, v: f64) {
        let t = self.sum + v;
        if self.sum.abs() >= v.abs() {
            self.compensation += (self.sum - t) + v;
        } else {
            self.compensation += (v - t) + self.sum;
        }
        self.sum = t;
    }

    fn total(&self) -> f64 {
        self.sum + self.compensation
    }

    fn is_finite(&self) -> bool {
        self.total().is_finite()
    }

    /// Mean of `window`, whose sum this is. Falls back to summing `v / divisor`
    /// when the plain sum leaves the finite range.
    fn mean(&self, window: &[f64], divisor: f64) -> f64 {
        let mean = self.total() / divisor;
        if mean.is_finite() {
            return mean;
        }
        let mut scaled = Self::default();
        for &v in window {
            scaled.add(v / divisor);
        }
        scaled.total()
    }
}

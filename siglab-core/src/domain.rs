//! CloseSeries: the fundamental input of a job.

use serde::{Deserialize, Serialize};

/// Ordered close prices, one per input row, in time order.
///
/// Built once by the loader and never mutated afterwards; every derived
/// series (rolling mean, signal) is a fresh `Vec` of the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloseSeries(Vec<f64>);

impl CloseSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the first NaN or infinite value, if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.0.iter().position(|v| !v.is_finite())
    }
}

impl From<Vec<f64>> for CloseSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl AsRef<[f64]> for CloseSeries {
    fn as_ref(&self) -> &[f64] {
        self.as_slice()
    }
}

//! Dataset fingerprinting.
//!
//! A BLAKE3 digest over the close series lets the run log prove that two runs
//! consumed identical data, independently of file formatting (whitespace,
//! column order, unused OHLV columns).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deterministic content hash of a close series (hex-encoded BLAKE3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    /// Hash the series length followed by every value's little-endian bytes, in order.
    pub fn of_closes(values: &[f64]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(values.len() as u64).to_le_bytes());
        for value in values {
            hasher.update(&value.to_le_bytes());
        }
        Self(hasher.finalize().to_hex().to_string())
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

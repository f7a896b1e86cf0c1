//! Metrics document: the single JSON artifact a job emits.
//!
//! Two shapes, selected by `status`:
//!
//! ```text
//! success: {version, rows_processed, metric, value, latency_ms, seed, status}
//! error:   {version, status, error_message}
//! ```
//!
//! The document is serialized once; the same string goes to the output file
//! and to stdout.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use siglab_core::SignalOutcome;
use thiserror::Error;

/// Value of the `metric` field.
pub const METRIC_NAME: &str = "signal_rate";

/// Version reported when a job fails before its config supplied one.
pub const FALLBACK_VERSION: &str = "v1";

/// Errors from emitting the metrics document.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize metrics document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write metrics document: {0}")]
    Write(#[source] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessMetrics {
    pub version: String,
    pub rows_processed: usize,
    pub metric: String,
    /// Signal rate, rounded half-to-even at 4 decimals.
    pub value: f64,
    pub latency_ms: u64,
    pub seed: i64,
    pub status: RunStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetrics {
    pub version: String,
    pub status: RunStatus,
    pub error_message: String,
}

/// The job's output contract. Build it with `success()` or `error()` so that
/// `status` always agrees with the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricsDocument {
    Success(SuccessMetrics),
    Error(ErrorMetrics),
}

impl MetricsDocument {
    pub fn success(version: &str, rows_processed: usize, outcome: &SignalOutcome) -> Self {
        Self::Success(SuccessMetrics {
            version: version.to_string(),
            rows_processed,
            metric: METRIC_NAME.to_string(),
            value: outcome.rate.value(),
            latency_ms: outcome.latency_ms(),
            seed: outcome.seed,
            status: RunStatus::Success,
        })
    }

    pub fn error(version: &str, message: impl Into<String>) -> Self {
        Self::Error(ErrorMetrics {
            version: version.to_string(),
            status: RunStatus::Error,
            error_message: message.into(),
        })
    }

    pub fn status(&self) -> RunStatus {
        match self {
            Self::Success(_) => RunStatus::Success,
            Self::Error(_) => RunStatus::Error,
        }
    }

    pub fn version(&self) -> &str {
        match self {
            Self::Success(m) => &m.version,
            Self::Error(m) => &m.version,
        }
    }

    /// Pretty-printed JSON (2-space indent), the exact form written and printed.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Writes the metrics document to the output path and echoes it to a console stream.
#[derive(Debug, Clone)]
pub struct MetricsReporter {
    output: PathBuf,
}

impl MetricsReporter {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Write `doc` to the output path, then print the same JSON to `console`.
    ///
    /// A success document that could not be written is not printed: the
    /// caller reports the failure with an error document instead. An error
    /// document is printed even when the file write fails, so the console
    /// always shows exactly one document per run. Console failures are
    /// logged and otherwise ignored.
    pub fn publish(
        &self,
        doc: &MetricsDocument,
        console: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let json = doc.to_json()?;
        let written =
            std::fs::write(&self.output, format!("{json}\n")).map_err(ReportError::Write);

        if written.is_ok() || doc.status() == RunStatus::Error {
            if let Err(e) = writeln!(console, "{json}").and_then(|()| console.flush()) {
                tracing::warn!(error = %e, "failed to print metrics document");
            }
        }

        written
    }
}

//! SigLab Runner: job orchestration on top of `siglab-core`.
//!
//! This crate provides:
//! - YAML job configuration (`seed`, `window`, `version`)
//! - Strict CSV loading of the `close` column
//! - The success/error metrics document and its reporter
//! - The append-only, stage-labeled run log
//! - `run_job()`, the fail-fast pipeline tying them together

pub mod config;
pub mod data_loader;
pub mod metrics;
pub mod run_log;
pub mod runner;
pub mod stage;

pub use config::{ConfigError, RunConfig};
pub use data_loader::{load_close_series, read_close_series, DataError, LoadedData};
pub use metrics::{
    ErrorMetrics, MetricsDocument, MetricsReporter, ReportError, RunStatus, SuccessMetrics,
    FALLBACK_VERSION, METRIC_NAME,
};
pub use run_log::RunLogger;
pub use runner::{run_job, JobOutcome, JobPaths, RunError, FAILURE_EXIT_CODE};
pub use stage::JobStage;

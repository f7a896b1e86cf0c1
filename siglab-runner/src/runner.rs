//! Job runner: wires config, data, engine, metrics, and the run log.
//!
//! `run_job()` is the single entry point used by the CLI. It never returns an
//! error: every failure is classified into a `RunError`, logged, and turned
//! into the error-shaped metrics document. The caller only maps the outcome
//! to an exit code.

use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;

use siglab_core::{ComputeError, SeededRng, SignalEngine};

use crate::config::{ConfigError, RunConfig};
use crate::data_loader::{load_close_series, DataError};
use crate::metrics::{MetricsDocument, MetricsReporter, ReportError, FALLBACK_VERSION};
use crate::run_log::RunLogger;
use crate::stage::JobStage;

/// Exit code for a job that ended in `JobStage::Failed`.
pub const FAILURE_EXIT_CODE: u8 = 1;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("computation error: {0}")]
    Compute(#[from] ComputeError),
    #[error("io error: {0}")]
    Report(#[from] ReportError),
}

/// The four paths a job needs. All are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    pub input: PathBuf,
    pub config: PathBuf,
    pub output: PathBuf,
    pub log_file: PathBuf,
}

/// How a job ended.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// The one document that was emitted.
    pub document: MetricsDocument,
    /// `JobStage::Success` or `JobStage::Failed`.
    pub final_stage: JobStage,
    /// For failed jobs, the stage the job was working toward when it failed.
    pub failed_at: Option<JobStage>,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.final_stage == JobStage::Success
    }

    pub fn exit_code(&self) -> u8 {
        if self.succeeded() {
            0
        } else {
            FAILURE_EXIT_CODE
        }
    }
}

/// Run one job end to end, writing the metrics document to `paths.output`
/// and echoing it to `console`.
pub fn run_job(paths: &JobPaths, console: &mut dyn Write) -> JobOutcome {
    let mut job = Job {
        stage: JobStage::Started,
        version: None,
        log: RunLogger::new(&paths.log_file),
    };
    let reporter = MetricsReporter::new(&paths.output);

    job.log.info(
        JobStage::Started,
        format!(
            "Job started: input={}, config={}, output={}",
            paths.input.display(),
            paths.config.display(),
            paths.output.display()
        ),
    );

    match job.execute(paths, &reporter, console) {
        Ok((document, latency_ms)) => {
            job.advance(JobStage::Success);
            job.log.info(
                JobStage::Success,
                format!("Job completed successfully in {latency_ms}ms"),
            );
            JobOutcome {
                document,
                final_stage: JobStage::Success,
                failed_at: None,
            }
        }
        Err(err) => job.fail(err, &reporter, console),
    }
}

struct Job {
    stage: JobStage,
    version: Option<String>,
    log: RunLogger,
}

impl Job {
    fn advance(&mut self, to: JobStage) {
        debug_assert!(
            self.stage.can_transition_to(to),
            "illegal transition {} -> {}",
            self.stage,
            to
        );
        self.stage = to;
    }

    /// The success path. Returns the published document and the computation latency.
    fn execute(
        &mut self,
        paths: &JobPaths,
        reporter: &MetricsReporter,
        console: &mut dyn Write,
    ) -> Result<(MetricsDocument, u64), RunError> {
        let config = RunConfig::from_file(&paths.config)?;
        self.version = Some(config.version.clone());
        self.advance(JobStage::ConfigLoaded);
        self.log.info(
            JobStage::ConfigLoaded,
            format!(
                "Config loaded: seed={}, window={}, version={}",
                config.seed, config.window, config.version
            ),
        );
        self.log.info(JobStage::ConfigLoaded, "Configuration verified");

        let data = load_close_series(&paths.input)?;
        self.advance(JobStage::DataLoaded);
        self.log.info(
            JobStage::DataLoaded,
            format!(
                "Data loaded: {} rows (dataset {})",
                data.rows_processed,
                data.dataset_hash.short()
            ),
        );

        let engine = SignalEngine::new(config.window)?;
        let mut rng = SeededRng::new(config.seed);
        self.log
            .info(JobStage::Computed, format!("Seed applied: {}", rng.seed()));
        let outcome = engine.run(&data.close, &mut rng)?;
        self.advance(JobStage::Computed);
        self.log.info(
            JobStage::Computed,
            format!("Rolling mean calculated with window={}", outcome.window),
        );
        self.log.info(
            JobStage::Computed,
            format!(
                "Signals generated: {} of {} rows above rolling mean",
                outcome.hits, outcome.rows
            ),
        );

        let document = MetricsDocument::success(&config.version, data.rows_processed, &outcome);
        reporter.publish(&document, console)?;
        self.advance(JobStage::Reported);
        self.log.info(
            JobStage::Reported,
            format!(
                "Metrics: signal_rate={}, rows_processed={}",
                outcome.rate, data.rows_processed
            ),
        );

        Ok((document, outcome.latency_ms()))
    }

    /// The error path: log, emit the error document, finish in `Failed`.
    fn fail(
        mut self,
        err: RunError,
        reporter: &MetricsReporter,
        console: &mut dyn Write,
    ) -> JobOutcome {
        let failed_at = self.stage.next().unwrap_or(self.stage);
        self.advance(JobStage::Failed);

        let message = err.to_string();
        self.log.error(
            JobStage::Failed,
            format!("Job failed while {}: {message}", failed_at.activity()),
        );

        let version = self.version.as_deref().unwrap_or(FALLBACK_VERSION);
        let document = MetricsDocument::error(version, message);
        if let Err(e) = reporter.publish(&document, console) {
            self.log.error(
                JobStage::Failed,
                format!("Failed to write error output JSON: {e}"),
            );
        }

        JobOutcome {
            document,
            final_stage: JobStage::Failed,
            failed_at: Some(failed_at),
        }
    }
}

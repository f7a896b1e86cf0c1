//! SigLab CLI: run the signal-rate job over one OHLCV CSV file.
//!
//! ```text
//! siglab --input data.csv --config config.yaml --output metrics.json --log-file run.log
//! ```
//!
//! The metrics document is the only thing written to stdout. Diagnostics go
//! to stderr (filter with `RUST_LOG`, default `info`). Exit code is 0 on
//! success and 1 on any failure.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use siglab_runner::{run_job, JobPaths};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "siglab",
    about = "SigLab: rolling-mean signal rate over an OHLCV close series"
)]
struct Cli {
    /// Input CSV path. Must have a header row with a `close` column.
    #[arg(long)]
    input: PathBuf,

    /// YAML config path with `seed`, `window`, and `version`.
    #[arg(long)]
    config: PathBuf,

    /// Output path for the metrics JSON document.
    #[arg(long)]
    output: PathBuf,

    /// Run log path. Appended to, never truncated.
    #[arg(long)]
    log_file: PathBuf,
}

impl From<Cli> for JobPaths {
    fn from(cli: Cli) -> Self {
        JobPaths {
            input: cli.input,
            config: cli.config,
            output: cli.output,
            log_file: cli.log_file,
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("warning: diagnostics disabled: {e:#}");
    }

    let paths = JobPaths::from(Cli::parse());
    let stdout = io::stdout();
    let outcome = run_job(&paths, &mut stdout.lock());

    ExitCode::from(outcome.exit_code())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!(e))
}

//! Append-only run log.
//!
//! One line per event:
//!
//! ```text
//! 2026-10-19T08:15:02.113Z INFO [config_loaded] Configuration verified
//! ```
//!
//! The file is opened in append mode for every line and closed again, so no
//! handle outlives a single write and nothing is ever truncated. Writing is
//! best-effort: a log sink that cannot be opened or written never aborts the
//! job. The first such failure is reported on the diagnostics stream; later
//! ones are dropped silently. Every line is also mirrored to `tracing`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::Level;

use crate::stage::JobStage;

#[derive(Debug)]
pub struct RunLogger {
    path: PathBuf,
    sink_failed: bool,
}

impl RunLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sink_failed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether any line failed to reach the log file.
    pub fn sink_failed(&self) -> bool {
        self.sink_failed
    }

    pub fn info(&mut self, stage: JobStage, message: impl AsRef<str>) {
        self.record(Level::INFO, stage, message.as_ref());
    }

    pub fn error(&mut self, stage: JobStage, message: impl AsRef<str>) {
        self.record(Level::ERROR, stage, message.as_ref());
    }

    fn record(&mut self, level: Level, stage: JobStage, message: &str) {
        if level == Level::ERROR {
            tracing::error!(stage = %stage, "{message}");
        } else {
            tracing::info!(stage = %stage, "{message}");
        }

        let line = format_line(level, stage, message);
        if let Err(e) = self.append(&line) {
            if !self.sink_failed {
                tracing::warn!(error = %e, "run log unavailable; continuing without it");
            }
            self.sink_failed = true;
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

fn format_line(level: Level, stage: JobStage, message: &str) -> String {
    // Messages are single-line; embedded newlines would split one event in two.
    let message = message.replace(['\r', '\n'], " ");
    format!(
        "{} {} [{}] {}\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        level,
        stage,
        message
    )
}

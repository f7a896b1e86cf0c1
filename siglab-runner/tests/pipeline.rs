//! End-to-end tests for the job pipeline.
//!
//! Each test writes a config and an input table into a fresh temp directory,
//! runs the whole job, and checks the emitted document, the console echo,
//! the exit code, and the run log.

use std::path::Path;

use serde_json::Value;
use siglab_runner::{run_job, JobOutcome, JobPaths, JobStage, FALLBACK_VERSION};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────

struct Fixture {
    dir: TempDir,
    paths: JobPaths,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let paths = JobPaths {
            input: dir.path().join("data.csv"),
            config: dir.path().join("config.yaml"),
            output: dir.path().join("metrics.json"),
            log_file: dir.path().join("run.log"),
        };
        Self { dir, paths }
    }

    fn with_config(self, yaml: &str) -> Self {
        std::fs::write(&self.paths.config, yaml).unwrap();
        self
    }

    fn with_closes(self, closes: &[f64]) -> Self {
        let mut csv = String::from("timestamp,open,high,low,close,volume\n");
        for (i, c) in closes.iter().enumerate() {
            csv.push_str(&format!(
                "2024-01-{:02},{c},{},{},{c},1000\n",
                i + 1,
                c + 1.0,
                c - 1.0
            ));
        }
        self.with_input(&csv)
    }

    fn with_input(self, csv: &str) -> Self {
        std::fs::write(&self.paths.input, csv).unwrap();
        self
    }

    fn run(&self) -> Run {
        let mut console = Vec::new();
        let outcome = run_job(&self.paths, &mut console);
        Run {
            outcome,
            console: String::from_utf8(console).unwrap(),
            file: std::fs::read_to_string(&self.paths.output).ok(),
            log: std::fs::read_to_string(&self.paths.log_file).unwrap_or_default(),
        }
    }
}

struct Run {
    outcome: JobOutcome,
    console: String,
    file: Option<String>,
    log: String,
}

impl Run {
    fn json(&self) -> Value {
        serde_json::from_str(&self.console).unwrap()
    }
}

const CONFIG: &str = "seed: 42\nwindow: 3\nversion: \"v1\"\n";

fn assert_error_document(run: &Run) {
    let doc = run.json();
    assert_eq!(doc["status"], "error");
    assert!(!doc["error_message"].as_str().unwrap().is_empty());
    assert!(doc.get("value").is_none());
    assert_eq!(run.outcome.exit_code(), 1);
    assert_eq!(run.outcome.final_stage, JobStage::Failed);
}

fn log_lines(run: &Run) -> Vec<&str> {
    run.log.lines().collect()
}

fn write_dir_only(path: &Path) {
    std::fs::create_dir_all(path).unwrap();
}

// ── Success path ─────────────────────────────────────────────────────

#[test]
fn ascending_closes_rate_is_point_six() {
    let fx = Fixture::new()
        .with_config(CONFIG)
        .with_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let run = fx.run();

    assert!(run.outcome.succeeded());
    assert_eq!(run.outcome.exit_code(), 0);

    let doc = run.json();
    assert_eq!(doc["version"], "v1");
    assert_eq!(doc["rows_processed"], 5);
    assert_eq!(doc["metric"], "signal_rate");
    assert_eq!(doc["value"], 0.6);
    assert_eq!(doc["seed"], 42);
    assert_eq!(doc["status"], "success");
    assert!(doc["latency_ms"].as_u64().is_some());
    assert_eq!(doc.as_object().unwrap().len(), 7);
}

#[test]
fn descending_closes_rate_is_zero() {
    let fx = Fixture::new()
        .with_config("seed: 7\nwindow: 2\nversion: v2\n")
        .with_closes(&[5.0, 4.0, 3.0, 2.0, 1.0]);
    let doc = fx.run().json();

    assert_eq!(doc["value"], 0.0);
    assert_eq!(doc["version"], "v2");
    assert_eq!(doc["seed"], 7);
}

#[test]
fn window_not_shorter_than_rows_rate_is_zero() {
    let fx = Fixture::new()
        .with_config("seed: 1\nwindow: 10\nversion: v1\n")
        .with_closes(&[1.0, 5.0, 9.0, 20.0]);
    let doc = fx.run().json();
    assert_eq!(doc["status"], "success");
    assert_eq!(doc["value"], 0.0);
    assert_eq!(doc["rows_processed"], 4);
}

#[test]
fn output_file_and_console_are_identical() {
    let fx = Fixture::new()
        .with_config(CONFIG)
        .with_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let run = fx.run();
    assert_eq!(run.file.as_deref(), Some(run.console.as_str()));
}

#[test]
fn repeated_runs_agree_on_everything_but_latency() {
    let closes: Vec<f64> = (0..200)
        .map(|i| 50.0 + ((i * 37) % 11) as f64 - (i as f64) * 0.01)
        .collect();
    let fx = Fixture::new()
        .with_config("seed: -5\nwindow: 7\nversion: v3\n")
        .with_closes(&closes);

    let mut first = fx.run().json();
    let mut second = fx.run().json();
    first.as_object_mut().unwrap().remove("latency_ms");
    second.as_object_mut().unwrap().remove("latency_ms");
    assert_eq!(first, second);
    assert_eq!(first["seed"], -5);
}

#[test]
fn rows_processed_counts_every_data_row() {
    let fx = Fixture::new()
        .with_config(CONFIG)
        .with_input("close\n1\n2\n3\n4\n5\n6\n7\n");
    assert_eq!(fx.run().json()["rows_processed"], 7);
}

#[test]
fn success_log_trail() {
    let fx = Fixture::new()
        .with_config(CONFIG)
        .with_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let run = fx.run();
    let lines = log_lines(&run);

    let expected = [
        "[started] Job started",
        "[config_loaded] Config loaded: seed=42, window=3, version=v1",
        "[config_loaded] Configuration verified",
        "[data_loaded] Data loaded: 5 rows",
        "[computed] Seed applied: 42",
        "[computed] Rolling mean calculated with window=3",
        "[computed] Signals generated: 3 of 5 rows above rolling mean",
        "[reported] Metrics: signal_rate=0.6000, rows_processed=5",
        "[success] Job completed successfully in",
    ];
    assert_eq!(lines.len(), expected.len(), "{}", run.log);
    for (line, marker) in lines.iter().zip(expected) {
        assert!(line.contains(marker), "expected {marker:?} in {line:?}");
    }
}

#[test]
fn log_is_appended_across_runs() {
    let fx = Fixture::new()
        .with_config(CONFIG)
        .with_closes(&[1.0, 2.0, 3.0]);
    let first = fx.run();
    let second = fx.run();
    assert_eq!(
        log_lines(&second).len(),
        2 * log_lines(&first).len(),
        "{}",
        second.log
    );
}

// ── Error path ───────────────────────────────────────────────────────

#[test]
fn empty_config_file_fails() {
    let fx = Fixture::new()
        .with_config("")
        .with_closes(&[1.0, 2.0, 3.0]);
    let run = fx.run();

    assert_error_document(&run);
    assert_eq!(run.json()["version"], FALLBACK_VERSION);
    assert_eq!(run.outcome.failed_at, Some(JobStage::ConfigLoaded));
    assert_eq!(run.file.as_deref(), Some(run.console.as_str()));
}

#[test]
fn missing_config_keys_fail() {
    for yaml in [
        "window: 3\nversion: v1\n",
        "seed: 1\nversion: v1\n",
        "seed: 1\nwindow: 3\n",
    ] {
        let fx = Fixture::new()
            .with_config(yaml)
            .with_closes(&[1.0, 2.0, 3.0]);
        let run = fx.run();
        assert_error_document(&run);
        let message = run.json()["error_message"].as_str().unwrap().to_string();
        assert!(message.starts_with("config error:"), "{message}");
    }
}

#[test]
fn missing_config_file_fails() {
    let fx = Fixture::new().with_closes(&[1.0, 2.0, 3.0]);
    let run = fx.run();
    assert_error_document(&run);
    assert_eq!(run.json()["version"], FALLBACK_VERSION);
}

#[test]
fn missing_close_column_fails_with_config_version() {
    let fx = Fixture::new()
        .with_config("seed: 1\nwindow: 2\nversion: v7\n")
        .with_input("open,high,low,volume\n1,2,0.5,100\n");
    let run = fx.run();

    assert_error_document(&run);
    let doc = run.json();
    assert_eq!(doc["version"], "v7");
    assert_eq!(
        doc["error_message"],
        "data error: missing required columns in dataset: ['close']"
    );
    assert_eq!(run.outcome.failed_at, Some(JobStage::DataLoaded));
}

#[test]
fn empty_table_fails_without_success_document() {
    let fx = Fixture::new()
        .with_config(CONFIG)
        .with_input("timestamp,open,high,low,close,volume\n");
    let run = fx.run();

    assert_error_document(&run);
    assert_eq!(run.json()["error_message"], "data error: empty input file");
    assert!(!run.file.unwrap().contains("\"success\""));
}

#[test]
fn bad_close_value_aborts_whole_job() {
    let fx = Fixture::new()
        .with_config(CONFIG)
        .with_input("close\n1\n2\nNaN\n4\n");
    let run = fx.run();
    assert_error_document(&run);
    assert_eq!(
        run.json()["error_message"],
        "data error: non-finite close value at row 3"
    );
}

#[test]
fn missing_input_file_fails() {
    let fx = Fixture::new().with_config(CONFIG);
    let run = fx.run();
    assert_error_document(&run);
    let message = run.json()["error_message"].as_str().unwrap().to_string();
    assert!(!message.contains(fx.dir.path().to_str().unwrap()), "{message}");
}

#[test]
fn failure_log_records_stage_and_message() {
    let fx = Fixture::new()
        .with_config(CONFIG)
        .with_input("open\n1\n");
    let run = fx.run();
    let last = *log_lines(&run).last().unwrap();
    assert!(last.contains("ERROR [failed] Job failed while loading data:"), "{last}");
    assert!(last.contains("missing required columns"), "{last}");
}

#[test]
fn unwritable_output_becomes_error_document() {
    let fx = Fixture::new()
        .with_config(CONFIG)
        .with_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    write_dir_only(&fx.paths.output);
    let run = fx.run();

    assert_error_document(&run);
    assert_eq!(run.outcome.failed_at, Some(JobStage::Reported));
    let message = run.json()["error_message"].as_str().unwrap().to_string();
    assert!(message.starts_with("io error:"), "{message}");
    // Exactly one document reached the console.
    assert_eq!(run.console.matches("\"status\"").count(), 1);
    assert!(run.log.contains("Failed to write error output JSON"));
}

#[test]
fn unwritable_log_does_not_affect_the_result() {
    let fx = Fixture::new()
        .with_config(CONFIG)
        .with_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    write_dir_only(&fx.paths.log_file);
    let run = fx.run();

    assert!(run.outcome.succeeded());
    assert_eq!(run.json()["value"], 0.6);
}

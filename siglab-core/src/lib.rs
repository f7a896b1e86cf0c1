//! SigLab Core: close series, rolling mean, signal derivation, seeded reduction.
//!
//! This crate contains the computation proper and nothing else:
//! - `CloseSeries`, the ordered close prices a job runs over
//! - Trailing rolling mean with explicit warmup (`None` until the window fills)
//! - Close-above-mean signal derivation and its rounded rate
//! - Explicit seeded RNG, applied once per job
//! - `SignalEngine`, which wires the above and times the computation
//!
//! No I/O and no logging happen here; the runner owns both.

pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod indicators;
pub mod rng;
pub mod signal;

pub use domain::CloseSeries;
pub use engine::{ComputeError, SignalEngine, SignalOutcome};
pub use fingerprint::DatasetHash;
pub use indicators::RollingMean;
pub use rng::SeededRng;
pub use signal::{derive_signals, reduce_signals, SignalRate};

//! Job stage machine.
//!
//! ```text
//! Started → ConfigLoaded → DataLoaded → Computed → Reported → Success
//!    └────────────┴─────────────┴───────────┴──────────┴──────→ Failed
//! ```
//!
//! `Success` and `Failed` are terminal. Every stage label also tags the run
//! log lines written while the job works toward or within that stage.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    Started,
    ConfigLoaded,
    DataLoaded,
    Computed,
    Reported,
    Success,
    Failed,
}

impl JobStage {
    /// The next stage on the success path, `None` once terminal.
    pub fn next(self) -> Option<JobStage> {
        match self {
            Self::Started => Some(Self::ConfigLoaded),
            Self::ConfigLoaded => Some(Self::DataLoaded),
            Self::DataLoaded => Some(Self::Computed),
            Self::Computed => Some(Self::Reported),
            Self::Reported => Some(Self::Success),
            Self::Success | Self::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    /// Whether moving from `self` to `to` is a legal transition.
    pub fn can_transition_to(self, to: JobStage) -> bool {
        self.next() == Some(to) || (to == Self::Failed && !self.is_terminal())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::ConfigLoaded => "config_loaded",
            Self::DataLoaded => "data_loaded",
            Self::Computed => "computed",
            Self::Reported => "reported",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    /// The work performed to reach this stage, for failure messages.
    pub fn activity(self) -> &'static str {
        match self {
            Self::Started => "starting the job",
            Self::ConfigLoaded => "loading config",
            Self::DataLoaded => "loading data",
            Self::Computed => "computing the signal",
            Self::Reported => "reporting metrics",
            Self::Success => "completing the job",
            Self::Failed => "handling a failure",
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//! Job configuration loaded from YAML.
//!
//! Exactly three keys are recognized, all required:
//! - `seed`: any 64-bit signed integer, negative included
//! - `window`: an integer strictly greater than zero
//! - `version`: a non-empty string
//!
//! Unknown keys are ignored. The document is parsed into a generic YAML value
//! first and validated field by field, so every rejection names the offending key.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Required keys, in the order they are reported when missing.
pub const REQUIRED_KEYS: [&str; 3] = ["seed", "version", "window"];

/// Errors from loading or validating the job configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found")]
    NotFound,

    #[error("failed to read config file: {0}")]
    Read(#[source] std::io::Error),

    #[error("invalid YAML config format: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration file structure: expected a YAML mapping")]
    NotAMapping,

    #[error("invalid configuration file structure: missing keys {0:?}")]
    MissingKeys(Vec<String>),

    #[error("invalid configuration file structure: '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Validated, immutable configuration for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub seed: i64,
    pub window: usize,
    pub version: String,
}

impl RunConfig {
    /// Load and validate a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound);
        }
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let doc: Value = serde_yaml::from_str(content)?;
        let Value::Mapping(map) = doc else {
            return Err(ConfigError::NotAMapping);
        };

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| map.get(**key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing));
        }

        let seed = field(&map, "seed");
        let seed = seed.as_i64().ok_or(ConfigError::InvalidField {
            field: "seed",
            expected: if seed.is_u64() {
                "an integer in the 64-bit signed range"
            } else {
                "an integer"
            },
        })?;

        let window = field(&map, "window")
            .as_i64()
            .filter(|w| *w > 0)
            .and_then(|w| usize::try_from(w).ok())
            .ok_or(ConfigError::InvalidField {
                field: "window",
                expected: "a positive integer",
            })?;

        let version = field(&map, "version")
            .as_str()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::InvalidField {
                field: "version",
                expected: "a non-empty string",
            })?
            .to_string();

        Ok(Self {
            seed,
            window,
            version,
        })
    }
}

/// Look up a key already known to be present.
fn field<'a>(map: &'a Mapping, key: &str) -> &'a Value {
    map.get(key).unwrap_or(&Value::Null)
}

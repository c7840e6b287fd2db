//! Console configuration
//!
//! Defaults, then an optional YAML file named by `KEPLER_CONFIG`, then
//! individual environment overrides. `.env` is loaded by the binary before
//! any of this runs.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::prediction::Task;
use crate::utils::telemetry::DEFAULT_FILTER;

pub const CONFIG_PATH_VAR: &str = "KEPLER_CONFIG";
pub const API_URL_VAR: &str = "PREDICTION_API_URL";
pub const TIMEOUT_VAR: &str = "PREDICTION_TIMEOUT_SECS";
pub const TASKS_VAR: &str = "PREDICTION_TASKS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the prediction service
    pub api_url: String,
    pub timeout_secs: u64,
    pub tasks: Vec<Task>,
    /// Used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            timeout_secs: 10,
            tasks: vec![Task::Classification],
            log_filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Resolve configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse { path: display, source })
    }

    /// Apply overrides from any key lookup (the environment, in production).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            self.timeout_secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue { key: TIMEOUT_VAR, value: raw.clone() })?;
        }

        if let Some(raw) = lookup(TASKS_VAR) {
            self.tasks = raw
                .split(',')
                .filter(|t| !t.trim().is_empty())
                .map(|t| t.parse::<Task>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| ConfigError::InvalidValue { key: TASKS_VAR, value: raw.clone() })?;
        }

        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

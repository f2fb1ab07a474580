//! Serving configuration: artifact location and prediction recording.

use std::env;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ServiceEnvConfig {
    pub pipeline_path: PathBuf,
    /// SQLite URL for the result store. Unset means predictions are not recorded.
    pub database_url: Option<String>,
    pub record_predictions: bool,
}

impl Default for ServiceEnvConfig {
    fn default() -> Self {
        Self {
            pipeline_path: PathBuf::from("experiments/rand_forest_pipeline.json"),
            database_url: None,
            record_predictions: true,
        }
    }
}

impl ServiceEnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            pipeline_path: env::var("PIPELINE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.pipeline_path),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            record_predictions: env::var("RECORD_PREDICTIONS")
                .ok()
                .and_then(|v| {
                    let flag = parse_flag(&v);
                    if flag.is_none() {
                        warn!(
                            "Ignoring RECORD_PREDICTIONS={:?}, keeping default {}",
                            v, defaults.record_predictions
                        );
                    }
                    flag
                })
                .unwrap_or(defaults.record_predictions),
        }
    }

    /// Database URL when recording is both enabled and configured.
    pub fn recording_url(&self) -> Option<&str> {
        if self.record_predictions {
            self.database_url.as_deref()
        } else {
            None
        }
    }
}

/// Accepts the usual boolean spellings, case-insensitively.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

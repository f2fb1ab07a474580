//! Configuration for the car price pipeline.
//!
//! Paths and service switches come from environment variables; training
//! hyperparameters come from a TOML file located by `TRAINING_CONFIG`.

mod data_config;
mod service_config;
mod training_config;

pub use data_config::DataEnvConfig;
pub use service_config::ServiceEnvConfig;
pub use training_config::{SplitConfig, TrainingConfig};

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_TRAINING_CONFIG_PATH: &str = "config/training.toml";

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub data: DataEnvConfig,
    pub service: ServiceEnvConfig,
    pub training: TrainingConfig,
    pub training_config_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables and the training TOML file.
    pub fn from_env() -> Result<Self> {
        let data = DataEnvConfig::from_env();
        let service = ServiceEnvConfig::from_env();

        let training_config_path = PathBuf::from(
            env::var("TRAINING_CONFIG").unwrap_or_else(|_| DEFAULT_TRAINING_CONFIG_PATH.to_string()),
        );
        let training = TrainingConfig::load_or_default(&training_config_path)
            .context("Failed to load training config")?;

        Ok(Self {
            data,
            service,
            training,
            training_config_path,
        })
    }
}

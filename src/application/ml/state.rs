//! Persisted pipeline artifact: fitted encoder, trained forest and training metadata.
//!
//! The whole state is one JSON document written at training time and loaded
//! once when a [`PredictionService`](super::service::PredictionService) starts.

use super::forest::RegressionModel;
use crate::domain::errors::PipelineError;
use crate::domain::ml::{FeatureSchema, FittedEncoder, ForestParams, RegressionMetrics};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Bumped whenever the artifact layout changes incompatibly.
pub const STATE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub trained_at: DateTime<Utc>,
    pub train_rows: usize,
    pub params: ForestParams,
    /// Held-out metrics, when a test split was evaluated.
    pub evaluation: Option<RegressionMetrics>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainedPipelineState {
    pub format_version: u32,
    pub encoder: FittedEncoder,
    pub model: RegressionModel,
    pub metadata: TrainingMetadata,
}

impl TrainedPipelineState {
    pub fn new(encoder: FittedEncoder, model: RegressionModel, metadata: TrainingMetadata) -> Self {
        Self {
            format_version: STATE_FORMAT_VERSION,
            encoder,
            model,
            metadata,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.encoder.schema()
    }

    /// Writes the state atomically: temp file first, then rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create pipeline directory")?;
        }

        let content =
            serde_json::to_vec(self).context("Failed to serialize pipeline state")?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content).context("Failed to write temp file")?;
        fs::rename(&temp_path, path).context("Failed to rename temp file")?;

        info!("Pipeline saved to {:?}", path);
        Ok(())
    }

    /// Loads and checks a persisted state.
    ///
    /// Any failure here is a startup condition: the caller should not serve.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let load_error = |reason: String| PipelineError::StateLoad {
            path: path.display().to_string(),
            reason,
        };

        let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
        let state: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| load_error(format!("corrupt artifact: {}", e)))?;

        if state.format_version != STATE_FORMAT_VERSION {
            return Err(load_error(format!(
                "unsupported format version {} (expected {})",
                state.format_version, STATE_FORMAT_VERSION
            )));
        }
        if state.encoder.schema().len() != state.model.n_features() {
            return Err(load_error(format!(
                "encoder produces {} columns but model expects {}",
                state.encoder.schema().len(),
                state.model.n_features()
            )));
        }

        info!(
            "Pipeline loaded from {:?} (trained {}, {} columns)",
            path,
            state.metadata.trained_at,
            state.schema().len()
        );
        Ok(state)
    }
}

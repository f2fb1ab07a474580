use super::predictor::PricePredictor;
use super::state::TrainedPipelineState;
use crate::domain::car::FeatureRow;
use crate::domain::errors::PipelineError;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Serves predictions from a frozen pipeline state.
///
/// The state is owned and never mutated after construction, so one service
/// can be shared behind an `Arc` by concurrent callers.
#[derive(Debug)]
pub struct PredictionService {
    state: TrainedPipelineState,
}

impl PredictionService {
    /// Loads the persisted state. A failure here means the process must not serve.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        Ok(Self::from_state(TrainedPipelineState::load(path)?))
    }

    pub fn from_state(state: TrainedPipelineState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &TrainedPipelineState {
        &self.state
    }

    /// Validates an untyped request body, then predicts.
    pub fn predict_json(&self, value: &Value) -> Result<f64, PipelineError> {
        let row = FeatureRow::from_json(value)?;
        self.predict(&row)
    }

    pub fn predict_batch(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, PipelineError> {
        let x = self.state.encoder.transform_batch(rows)?;
        self.state.model.predict(&x)
    }
}

impl PricePredictor for PredictionService {
    fn predict(&self, row: &FeatureRow) -> Result<f64, PipelineError> {
        let aligned = self.state.encoder.align(row)?;
        if aligned.zero_filled > 0 || !aligned.dropped.is_empty() {
            debug!(
                "Aligned request: {} columns zero-filled, dropped {:?}",
                aligned.zero_filled, aligned.dropped
            );
        }
        self.state.model.predict_one(&aligned.values)
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }

    fn version(&self) -> &str {
        "v1"
    }
}

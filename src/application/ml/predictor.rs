use crate::domain::car::FeatureRow;
use crate::domain::errors::PipelineError;

/// Interface for price models
pub trait PricePredictor: Send + Sync {
    /// Predict the price for one row
    fn predict(&self, row: &FeatureRow) -> Result<f64, PipelineError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}

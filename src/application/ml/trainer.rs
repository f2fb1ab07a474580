use super::forest::RegressionModel;
use super::state::{TrainedPipelineState, TrainingMetadata};
use crate::config::TrainingConfig;
use crate::domain::car::{CarListing, ColumnSpec, FeatureRow};
use crate::domain::errors::PipelineError;
use crate::domain::ml::{FeatureEncoder, ForestParams, RegressionMetrics};
use chrono::Utc;
use tracing::info;

/// Predictions for a labelled set and the metrics they score.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub predictions: Vec<f64>,
    pub actuals: Vec<f64>,
    pub metrics: Option<RegressionMetrics>,
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub n_columns: usize,
    pub evaluation: Evaluation,
}

/// Fits the encoder and the forest in a single pass. No cross-validation, no search.
#[derive(Debug, Clone)]
pub struct PipelineTrainer {
    columns: ColumnSpec,
    params: ForestParams,
}

impl PipelineTrainer {
    pub fn new(columns: ColumnSpec, params: ForestParams) -> Self {
        Self { columns, params }
    }

    pub fn from_config(config: &TrainingConfig) -> Self {
        Self::new(config.columns.clone(), config.forest.clone())
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn train(&self, listings: &[CarListing]) -> Result<TrainedPipelineState, PipelineError> {
        let (rows, prices) = split_targets(listings);

        let encoder = FeatureEncoder::new(self.columns.clone()).fit(&rows)?;
        let x = encoder.transform_batch(&rows)?;
        let model = RegressionModel::fit(&x, &prices, &self.params)?;

        info!("Pipeline trained on {} rows", rows.len());

        let metadata = TrainingMetadata {
            trained_at: Utc::now(),
            train_rows: rows.len(),
            params: self.params.clone(),
            evaluation: None,
        };
        Ok(TrainedPipelineState::new(encoder, model, metadata))
    }

    /// Trains on `train`, scores on `test` and stores the test metrics in the state.
    pub fn train_and_evaluate(
        &self,
        train: &[CarListing],
        test: &[CarListing],
    ) -> Result<(TrainedPipelineState, TrainingReport), PipelineError> {
        let mut state = self.train(train)?;
        let evaluation = evaluate(&state, test)?;

        if let Some(metrics) = &evaluation.metrics {
            info!(
                "OOS Test (n={}): RMSE={:.2}, MAE={:.2}, R2 Score: {:.4}",
                metrics.samples, metrics.rmse, metrics.mae, metrics.r2
            );
        }
        state.metadata.evaluation = evaluation.metrics;

        let report = TrainingReport {
            train_rows: train.len(),
            test_rows: test.len(),
            n_columns: state.schema().len(),
            evaluation,
        };
        Ok((state, report))
    }
}

/// Runs labelled listings through a trained state.
pub fn evaluate(
    state: &TrainedPipelineState,
    listings: &[CarListing],
) -> Result<Evaluation, PipelineError> {
    let (rows, actuals) = split_targets(listings);
    let x = state.encoder.transform_batch(&rows)?;
    let predictions = state.model.predict(&x)?;
    let metrics = RegressionMetrics::calculate(&predictions, &actuals);

    Ok(Evaluation {
        predictions,
        actuals,
        metrics,
    })
}

fn split_targets(listings: &[CarListing]) -> (Vec<FeatureRow>, Vec<f64>) {
    listings.iter().map(|l| (l.features(), l.price)).unzip()
}

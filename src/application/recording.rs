//! Compute-then-record prediction flow.
//!
//! Phase one computes the price and may fail. Phase two appends the result
//! to the store on a best-effort basis: its failure is logged and reported
//! in the outcome, and never changes the computed price.

use crate::application::ml::PricePredictor;
use crate::domain::car::FeatureRow;
use crate::domain::errors::PipelineError;
use crate::domain::prediction::PredictionRecord;
use crate::domain::repositories::ResultStore;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Saved under this record id
    Stored(String),
    /// No store configured
    Skipped,
    /// The store rejected the write; the prediction stands
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub prediction: f64,
    pub record: RecordOutcome,
}

pub struct PredictionRecorder {
    predictor: Arc<dyn PricePredictor>,
    store: Option<Arc<dyn ResultStore>>,
}

impl PredictionRecorder {
    pub fn new(predictor: Arc<dyn PricePredictor>, store: Option<Arc<dyn ResultStore>>) -> Self {
        Self { predictor, store }
    }

    pub async fn predict_and_record(&self, row: FeatureRow) -> Result<PredictionOutcome, PipelineError> {
        let prediction = self.predictor.predict(&row)?;

        let record = match &self.store {
            None => RecordOutcome::Skipped,
            Some(store) => {
                let record = PredictionRecord::new(row, prediction);
                match store.save(&record).await {
                    Ok(()) => {
                        info!(
                            "Prediction {} stored ({:.2} from {} {})",
                            record.id,
                            prediction,
                            self.predictor.name(),
                            self.predictor.version()
                        );
                        RecordOutcome::Stored(record.id)
                    }
                    Err(e) => {
                        warn!("Failed to store prediction: {:#}", e);
                        RecordOutcome::Failed(e.to_string())
                    }
                }
            }
        };

        Ok(PredictionOutcome { prediction, record })
    }
}

use crate::domain::errors::{EncodingError, PipelineError};
use crate::domain::ml::ForestParams;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;
use tracing::info;

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest regressor over encoded feature vectors. Read-only once fit.
#[derive(Serialize, Deserialize)]
pub struct RegressionModel {
    forest: Forest,
    n_features: usize,
}

impl RegressionModel {
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &ForestParams) -> Result<Self, PipelineError> {
        params
            .validate()
            .map_err(|reason| PipelineError::Training { reason })?;
        if x.is_empty() || x.len() != y.len() {
            return Err(PipelineError::Training {
                reason: format!("{} feature rows for {} targets", x.len(), y.len()),
            });
        }

        let n_features = x[0].len();
        let x_matrix = DenseMatrix::from_2d_vec(&x.to_vec()).map_err(|e| PipelineError::Training {
            reason: format!("Matrix error: {}", e),
        })?;

        let forest_params = RandomForestRegressorParameters::default()
            .with_n_trees(params.n_trees)
            .with_max_depth(params.max_depth)
            .with_min_samples_leaf(params.min_samples_leaf)
            .with_min_samples_split(params.min_samples_split)
            .with_m(params.max_features.unwrap_or(n_features).min(n_features))
            .with_seed(params.seed);

        info!(
            "Training Random Forest Regressor (Trees: {}, Depth: {}, MinLeaf: {}) on {} rows x {} columns...",
            params.n_trees,
            params.max_depth,
            params.min_samples_leaf,
            x.len(),
            n_features
        );

        let forest = RandomForestRegressor::fit(&x_matrix, &y.to_vec(), forest_params).map_err(
            |e| PipelineError::Training {
                reason: e.to_string(),
            },
        )?;

        Ok(Self { forest, n_features })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, PipelineError> {
        if x.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(row) = x.iter().find(|row| row.len() != self.n_features) {
            return Err(EncodingError::ColumnCountMismatch {
                expected: self.n_features,
                actual: row.len(),
            }
            .into());
        }

        let matrix = DenseMatrix::from_2d_vec(&x.to_vec()).map_err(|e| PipelineError::Inference {
            reason: format!("Matrix creation failed: {}", e),
        })?;
        self.forest
            .predict(&matrix)
            .map_err(|e| PipelineError::Inference {
                reason: e.to_string(),
            })
    }

    pub fn predict_one(&self, x: &[f64]) -> Result<f64, PipelineError> {
        self.predict(&[x.to_vec()])?
            .first()
            .copied()
            .ok_or_else(|| PipelineError::Inference {
                reason: "No prediction returned".to_string(),
            })
    }
}

impl fmt::Debug for RegressionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegressionModel")
            .field("n_features", &self.n_features)
            .finish_non_exhaustive()
    }
}

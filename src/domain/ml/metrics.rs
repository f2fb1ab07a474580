use serde::{Deserialize, Serialize};

/// Regression quality over a set of predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub samples: usize,
    pub r2: f64,
    pub rmse: f64,
    pub mae: f64,
}

impl RegressionMetrics {
    /// Computes metrics over paired predictions and actual values.
    ///
    /// Returns `None` when the slices are empty or of different length.
    pub fn calculate(predictions: &[f64], actuals: &[f64]) -> Option<Self> {
        if predictions.is_empty() || predictions.len() != actuals.len() {
            return None;
        }
        let n = predictions.len() as f64;

        let sq_err: f64 = predictions
            .iter()
            .zip(actuals)
            .map(|(p, t)| (p - t).powi(2))
            .sum();
        let abs_err: f64 = predictions
            .iter()
            .zip(actuals)
            .map(|(p, t)| (p - t).abs())
            .sum();

        Some(Self {
            samples: predictions.len(),
            r2: r2_score(actuals, predictions),
            rmse: (sq_err / n).sqrt(),
            mae: abs_err / n,
        })
    }
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// A constant target gives 1.0 for a perfect fit and 0.0 otherwise.
pub fn r2_score(actuals: &[f64], predictions: &[f64]) -> f64 {
    if actuals.is_empty() {
        return 0.0;
    }
    let mean = actuals.iter().sum::<f64>() / actuals.len() as f64;
    let ss_tot: f64 = actuals.iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res: f64 = actuals
        .iter()
        .zip(predictions)
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

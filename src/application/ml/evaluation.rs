//! Held-out prediction cases stored as JSON files.
//!
//! Each file holds one case:
//!
//! ```json
//! {"X": {"Doors": 4, "Year": 2019, ...}, "y": {"prediction": 41234.5}}
//! ```

use super::predictor::PricePredictor;
use super::state::TrainedPipelineState;
use super::trainer::evaluate;
use crate::domain::car::{CarListing, FeatureRow};
use crate::domain::errors::PipelineError;
use crate::domain::ml::{RegressionMetrics, r2_score};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default relative tolerance between a served and a recorded prediction.
pub const DEFAULT_REL_TOL: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedPrice {
    pub prediction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldoutCase {
    /// Raw request body, validated when the case is evaluated.
    #[serde(rename = "X")]
    pub x: Value,
    pub y: ExpectedPrice,
}

#[derive(Debug, Clone)]
pub struct CaseResult {
    pub source: PathBuf,
    pub expected: f64,
    pub predicted: f64,
    pub within_tolerance: bool,
}

#[derive(Debug, Clone)]
pub struct HoldoutReport {
    pub cases: Vec<CaseResult>,
    pub r2: f64,
}

impl HoldoutReport {
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|c| !c.within_tolerance)
    }

    pub fn all_within_tolerance(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// `|a - b| <= rel_tol * max(|a|, |b|)`
pub fn is_close(a: f64, b: f64, rel_tol: f64) -> bool {
    a == b || (a - b).abs() <= rel_tol * a.abs().max(b.abs())
}

/// Reads every `*.json` case in `dir`, sorted by file name.
pub fn load_cases(dir: &Path) -> Result<Vec<(PathBuf, HoldoutCase)>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read cases directory {:?}", dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| -> Result<(PathBuf, HoldoutCase)> {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read case {:?}", path))?;
            let case: HoldoutCase = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse case {:?}", path))?;
            Ok((path, case))
        })
        .collect()
}

pub fn write_case(dir: &Path, name: &str, row: &FeatureRow, prediction: f64) -> Result<PathBuf> {
    fs::create_dir_all(dir).context("Failed to create cases directory")?;
    let case = HoldoutCase {
        x: serde_json::to_value(row).context("Failed to serialize feature row")?,
        y: ExpectedPrice { prediction },
    };
    let path = dir.join(format!("{}.json", name));
    let content = serde_json::to_string_pretty(&case).context("Failed to serialize case")?;
    fs::write(&path, content).with_context(|| format!("Failed to write case {:?}", path))?;
    Ok(path)
}

/// Predicts every case and compares against the recorded prediction.
///
/// A malformed case input fails the whole run: recorded cases are expected
/// to be valid requests.
pub fn evaluate_cases(
    predictor: &dyn PricePredictor,
    cases: &[(PathBuf, HoldoutCase)],
    rel_tol: f64,
) -> Result<HoldoutReport, PipelineError> {
    let mut results = Vec::with_capacity(cases.len());
    for (source, case) in cases {
        let row = FeatureRow::from_json(&case.x)?;
        let predicted = predictor.predict(&row)?;
        let within_tolerance = is_close(predicted, case.y.prediction, rel_tol);
        if !within_tolerance {
            warn!(
                "Case {:?}: predicted {:.2}, expected {:.2}",
                source, predicted, case.y.prediction
            );
        }
        results.push(CaseResult {
            source: source.clone(),
            expected: case.y.prediction,
            predicted,
            within_tolerance,
        });
    }

    let expected: Vec<f64> = results.iter().map(|c| c.expected).collect();
    let predicted: Vec<f64> = results.iter().map(|c| c.predicted).collect();
    let r2 = r2_score(&expected, &predicted);

    info!("Evaluated {} cases. R2 Score: {:.4}", results.len(), r2);
    Ok(HoldoutReport {
        cases: results,
        r2,
    })
}

/// Scores a persisted state against labelled listings.
///
/// Fails when there is nothing to score or when R² falls below `min_r2`.
pub fn score_listings(
    state: &TrainedPipelineState,
    listings: &[CarListing],
    min_r2: Option<f64>,
) -> Result<RegressionMetrics> {
    let evaluation = evaluate(state, listings)?;
    let Some(metrics) = evaluation.metrics else {
        bail!("No labelled listings to score");
    };

    info!(
        "Scored {} listings: RMSE={:.2}, MAE={:.2}, R2 Score: {:.4}",
        metrics.samples, metrics.rmse, metrics.mae, metrics.r2
    );
    if let Some(min_r2) = min_r2
        && metrics.r2 < min_r2
    {
        bail!("R2 Score {:.4} is below the required {:.4}", metrics.r2, min_r2);
    }
    Ok(metrics)
}

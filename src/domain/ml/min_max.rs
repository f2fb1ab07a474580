//! Min-max scaling for continuous columns.
//!
//! ```text
//! x_scaled = (x - min) / (max - min)
//! ```
//!
//! Bounds come from the training set. Values outside them scale outside
//! `[0, 1]`; nothing is clamped.

use crate::domain::car::FeatureRow;
use crate::domain::errors::EncodingError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledColumn {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

impl ScaledColumn {
    pub fn scale(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        // Constant column: keep the offset, same as a unit range
        let range = if range == 0.0 { 1.0 } else { range };
        (value - self.min) / range
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    columns: Vec<ScaledColumn>,
}

impl MinMaxScaler {
    pub fn fit(columns: &[String], rows: &[FeatureRow]) -> Result<Self, EncodingError> {
        if rows.is_empty() {
            return Err(EncodingError::EmptyTrainingSet);
        }

        let columns = columns
            .iter()
            .map(|name| -> Result<ScaledColumn, EncodingError> {
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                for row in rows {
                    let value = numeric_value(row, name)?;
                    min = min.min(value);
                    max = max.max(value);
                }
                Ok(ScaledColumn {
                    name: name.clone(),
                    min,
                    max,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ScaledColumn] {
        &self.columns
    }

    pub fn output_columns(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn encode(&self, row: &FeatureRow) -> Result<Vec<(String, f64)>, EncodingError> {
        self.columns
            .iter()
            .map(|column| -> Result<(String, f64), EncodingError> {
                let value = numeric_value(row, &column.name)?;
                Ok((column.name.clone(), column.scale(value)))
            })
            .collect()
    }
}

fn numeric_value(row: &FeatureRow, column: &str) -> Result<f64, EncodingError> {
    row.numeric(column).ok_or_else(|| EncodingError::WrongKind {
        column: column.to_string(),
        expected: "numeric",
    })
}

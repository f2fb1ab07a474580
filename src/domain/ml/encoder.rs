//! Feature encoder: ordinal codes, one-hot dummies and min-max scaling
//! composed into the exact column vector the regressor was trained on.
//!
//! Encoding is split in two types. [`FeatureEncoder`] only knows which
//! columns to use; fitting it yields a [`FittedEncoder`], which is the only
//! type that can transform rows. An encoder cannot be used before it is fit.

use crate::domain::car::{ColumnSpec, FeatureRow};
use crate::domain::errors::EncodingError;
use crate::domain::ml::min_max::MinMaxScaler;
use crate::domain::ml::one_hot::OneHotEncoder;
use crate::domain::ml::ordinal::OrdinalEncoder;
use crate::domain::ml::schema::{AlignedRow, FeatureSchema};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    columns: ColumnSpec,
}

impl FeatureEncoder {
    pub fn new(columns: ColumnSpec) -> Self {
        Self { columns }
    }

    pub fn fit(&self, rows: &[FeatureRow]) -> Result<FittedEncoder, EncodingError> {
        self.columns.validate()?;
        if rows.is_empty() {
            return Err(EncodingError::EmptyTrainingSet);
        }

        let ordinal = OrdinalEncoder::fit(&self.columns.ordinal, rows)?;
        let one_hot = OneHotEncoder::fit(&self.columns.categorical, rows)?;
        let scaler = MinMaxScaler::fit(&self.columns.numeric, rows)?;

        let mut columns = ordinal.output_columns();
        columns.extend(one_hot.output_columns());
        columns.extend(scaler.output_columns());
        let schema = FeatureSchema::new(columns);
        if schema.is_empty() {
            return Err(EncodingError::EmptySchema);
        }

        info!(
            "Fitted feature encoder on {} rows: {} output columns",
            rows.len(),
            schema.len()
        );

        Ok(FittedEncoder {
            ordinal,
            one_hot,
            scaler,
            schema,
        })
    }
}

/// Frozen encoding state learned from the training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedEncoder {
    ordinal: OrdinalEncoder,
    one_hot: OneHotEncoder,
    scaler: MinMaxScaler,
    schema: FeatureSchema,
}

impl FittedEncoder {
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn ordinal(&self) -> &OrdinalEncoder {
        &self.ordinal
    }

    pub fn one_hot(&self) -> &OneHotEncoder {
        &self.one_hot
    }

    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }

    /// Encodes a row and reports what the schema alignment filled in or dropped.
    pub fn align(&self, row: &FeatureRow) -> Result<AlignedRow, EncodingError> {
        let mut named = self.ordinal.encode(row)?;
        named.extend(self.one_hot.encode(row)?);
        named.extend(self.scaler.encode(row)?);
        Ok(self.schema.align(&named))
    }

    pub fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, EncodingError> {
        Ok(self.align(row)?.values)
    }

    pub fn transform_batch(&self, rows: &[FeatureRow]) -> Result<Vec<Vec<f64>>, EncodingError> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}

//! Ordinal encoding for small integer-valued columns (doors, year, owners).

use crate::domain::car::FeatureRow;
use crate::domain::errors::EncodingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Code written for a value that was not present at fit time.
pub const UNKNOWN_ORDINAL_CODE: f64 = -1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalColumn {
    pub name: String,
    /// Distinct training values, sorted ascending. A value's code is its index.
    pub categories: Vec<i64>,
}

impl OrdinalColumn {
    pub fn code(&self, value: i64) -> f64 {
        match self.categories.binary_search(&value) {
            Ok(index) => index as f64,
            Err(_) => {
                debug!(
                    "Unseen value {} in ordinal column {}, using sentinel",
                    value, self.name
                );
                UNKNOWN_ORDINAL_CODE
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalEncoder {
    columns: Vec<OrdinalColumn>,
}

impl OrdinalEncoder {
    pub fn fit(columns: &[String], rows: &[FeatureRow]) -> Result<Self, EncodingError> {
        let columns = columns
            .iter()
            .map(|name| -> Result<OrdinalColumn, EncodingError> {
                let mut distinct = BTreeSet::new();
                for row in rows {
                    distinct.insert(ordinal_value(row, name)?);
                }
                Ok(OrdinalColumn {
                    name: name.clone(),
                    categories: distinct.into_iter().collect(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[OrdinalColumn] {
        &self.columns
    }

    pub fn output_columns(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn encode(&self, row: &FeatureRow) -> Result<Vec<(String, f64)>, EncodingError> {
        self.columns
            .iter()
            .map(|column| -> Result<(String, f64), EncodingError> {
                let value = ordinal_value(row, &column.name)?;
                Ok((column.name.clone(), column.code(value)))
            })
            .collect()
    }
}

fn ordinal_value(row: &FeatureRow, column: &str) -> Result<i64, EncodingError> {
    row.ordinal(column).ok_or_else(|| EncodingError::WrongKind {
        column: column.to_string(),
        expected: "ordinal",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::test_rows::row;

    #[test]
    fn test_codes_follow_sorted_order() {
        let rows = vec![
            row("BMW", "X5", 2019, 45_000.0),
            row("BMW", "X5", 2005, 120_000.0),
            row("Audi", "A4", 2012, 80_000.0),
            row("Audi", "A4", 2019, 30_000.0),
        ];
        let encoder = OrdinalEncoder::fit(&["Year".to_string()], &rows).unwrap();
        assert_eq!(encoder.columns()[0].categories, vec![2005, 2012, 2019]);

        let encoded = encoder.encode(&row("BMW", "X5", 2012, 1.0)).unwrap();
        assert_eq!(encoded, vec![("Year".to_string(), 1.0)]);
    }

    #[test]
    fn test_fit_is_order_independent() {
        let a = vec![row("BMW", "X5", 2019, 1.0), row("Audi", "A4", 2001, 1.0)];
        let b = vec![row("Audi", "A4", 2001, 1.0), row("BMW", "X5", 2019, 1.0)];
        let columns = vec!["Year".to_string()];
        assert_eq!(
            OrdinalEncoder::fit(&columns, &a).unwrap(),
            OrdinalEncoder::fit(&columns, &b).unwrap()
        );
    }

    #[test]
    fn test_unseen_value_maps_to_sentinel() {
        let rows = vec![row("BMW", "X5", 2019, 1.0)];
        let encoder = OrdinalEncoder::fit(&["Year".to_string()], &rows).unwrap();
        let encoded = encoder.encode(&row("BMW", "X5", 1999, 1.0)).unwrap();
        assert_eq!(encoded[0].1, UNKNOWN_ORDINAL_CODE);
    }

    #[test]
    fn test_non_ordinal_column_is_rejected() {
        let rows = vec![row("BMW", "X5", 2019, 1.0)];
        let result = OrdinalEncoder::fit(&["Brand".to_string()], &rows);
        assert!(matches!(result, Err(EncodingError::WrongKind { .. })));
    }
}

//! One-hot (dummy) encoding for string categories.
//!
//! Categories are sorted and the first one of each column is the reference
//! level: it gets no dummy column, which keeps the design matrix free of the
//! dummy-variable trap.

use crate::domain::car::FeatureRow;
use crate::domain::errors::EncodingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotColumn {
    pub name: String,
    /// Sorted training categories; `categories[0]` is the dropped reference.
    pub categories: Vec<String>,
}

impl OneHotColumn {
    pub fn reference(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }

    pub fn dummy_name(&self, category: &str) -> String {
        format!("{}_{}", self.name, category)
    }

    pub fn dummy_columns(&self) -> Vec<String> {
        self.categories
            .iter()
            .skip(1)
            .map(|c| self.dummy_name(c))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    columns: Vec<OneHotColumn>,
}

impl OneHotEncoder {
    pub fn fit(columns: &[String], rows: &[FeatureRow]) -> Result<Self, EncodingError> {
        let columns = columns
            .iter()
            .map(|name| -> Result<OneHotColumn, EncodingError> {
                let mut distinct = BTreeSet::new();
                for row in rows {
                    distinct.insert(categorical_value(row, name)?.to_string());
                }
                Ok(OneHotColumn {
                    name: name.clone(),
                    categories: distinct.into_iter().collect(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[OneHotColumn] {
        &self.columns
    }

    /// Dummy columns in training order: per input column, sorted categories minus the reference.
    pub fn output_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .flat_map(|c| c.dummy_columns())
            .collect()
    }

    /// Expands the row into one `<column>_<value>` entry per categorical column.
    ///
    /// The expansion is not filtered here: the reference level and unseen
    /// values produce names the schema does not contain, and schema alignment
    /// drops them.
    pub fn encode(&self, row: &FeatureRow) -> Result<Vec<(String, f64)>, EncodingError> {
        self.columns
            .iter()
            .map(|column| -> Result<(String, f64), EncodingError> {
                let value = categorical_value(row, &column.name)?;
                Ok((column.dummy_name(value), 1.0))
            })
            .collect()
    }
}

fn categorical_value<'a>(row: &'a FeatureRow, column: &str) -> Result<&'a str, EncodingError> {
    row.categorical(column).ok_or_else(|| EncodingError::WrongKind {
        column: column.to_string(),
        expected: "categorical",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::test_rows::row;

    fn fitted() -> OneHotEncoder {
        let rows = vec![
            row("Toyota", "Corolla", 2015, 1.0),
            row("BMW", "X5", 2019, 1.0),
            row("Audi", "A4", 2012, 1.0),
            row("BMW", "3 Series", 2018, 1.0),
        ];
        OneHotEncoder::fit(&["Brand".to_string(), "Model".to_string()], &rows).unwrap()
    }

    #[test]
    fn test_reference_category_is_dropped() {
        let encoder = fitted();
        assert_eq!(encoder.columns()[0].reference(), Some("Audi"));
        assert_eq!(
            encoder.output_columns(),
            vec![
                "Brand_BMW",
                "Brand_Toyota",
                "Model_A4",
                "Model_Corolla",
                "Model_X5"
            ]
        );
    }

    #[test]
    fn test_encode_emits_one_entry_per_column() {
        let encoded = fitted().encode(&row("BMW", "X5", 2019, 1.0)).unwrap();
        assert_eq!(
            encoded,
            vec![
                ("Brand_BMW".to_string(), 1.0),
                ("Model_X5".to_string(), 1.0)
            ]
        );
    }

    #[test]
    fn test_unseen_category_is_not_in_vocabulary() {
        let encoder = fitted();
        let encoded = encoder.encode(&row("Tesla", "Model 3", 2021, 1.0)).unwrap();
        let vocabulary = encoder.output_columns();
        assert!(encoded.iter().all(|(name, _)| !vocabulary.contains(name)));
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Ordered list of the columns the model was trained on.
///
/// Any change to this order is a breaking change for a trained model, so the
/// schema is frozen at fit time and stored alongside the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

/// Result of aligning a named row against a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub values: Vec<f64>,
    /// Schema columns the row did not provide (written as 0.0).
    pub zero_filled: usize,
    /// Row columns the schema does not know about (discarded).
    pub dropped: Vec<String>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Left-joins `named` onto the schema.
    ///
    /// Columns missing from `named` are zero-filled and columns absent from
    /// the schema are dropped, so an unseen category ends up encoded exactly
    /// like the reference category of its column.
    pub fn align(&self, named: &[(String, f64)]) -> AlignedRow {
        let index: HashMap<&str, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let mut values = vec![0.0; self.columns.len()];
        let mut provided = vec![false; self.columns.len()];
        let mut dropped = Vec::new();

        for (name, value) in named {
            match index.get(name.as_str()) {
                Some(&i) => {
                    values[i] = *value;
                    provided[i] = true;
                }
                None => dropped.push(name.clone()),
            }
        }

        let zero_filled = provided.iter().filter(|p| !**p).count();
        if !dropped.is_empty() {
            debug!("Dropped columns outside the training schema: {:?}", dropped);
        }

        AlignedRow {
            values,
            zero_filled,
            dropped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(vec![
            "Year".to_string(),
            "Brand_BMW".to_string(),
            "Brand_Toyota".to_string(),
            "Mileage".to_string(),
        ])
    }

    fn named(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(n, v)| (n.to_string(), *v)).collect()
    }

    #[test]
    fn test_align_orders_by_schema() {
        let row = named(&[("Mileage", 0.5), ("Brand_Toyota", 1.0), ("Year", 3.0)]);
        let aligned = schema().align(&row);
        assert_eq!(aligned.values, vec![3.0, 0.0, 1.0, 0.5]);
        assert_eq!(aligned.zero_filled, 1);
        assert!(aligned.dropped.is_empty());
    }

    #[test]
    fn test_align_drops_unknown_columns() {
        let row = named(&[("Year", 1.0), ("Brand_Tesla", 1.0), ("Mileage", 0.2)]);
        let aligned = schema().align(&row);
        assert_eq!(aligned.values, vec![1.0, 0.0, 0.0, 0.2]);
        assert_eq!(aligned.dropped, vec!["Brand_Tesla".to_string()]);
        assert_eq!(aligned.zero_filled, 2);
    }

    #[test]
    fn test_align_empty_row_is_all_zero() {
        let aligned = schema().align(&[]);
        assert_eq!(aligned.values, vec![0.0; 4]);
        assert_eq!(aligned.zero_filled, 4);
    }

    #[test]
    fn test_position() {
        assert_eq!(schema().position("Brand_Toyota"), Some(2));
        assert_eq!(schema().position("Brand_Audi"), None);
        assert_eq!(schema().len(), 4);
    }
}

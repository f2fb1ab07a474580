use serde::{Deserialize, Serialize};

/// Impurity measure used to choose splits.
///
/// Regression trees only implement variance reduction, so this is the single
/// accepted value; anything else is rejected when the config is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitCriterion {
    #[default]
    SquaredError,
}

/// Random forest hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_trees: usize,
    pub criterion: SplitCriterion,
    pub max_depth: u16,
    pub min_samples_leaf: usize,
    pub min_samples_split: usize,
    /// Columns sampled per split. `None` uses every column.
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            criterion: SplitCriterion::SquaredError,
            max_depth: 18,
            min_samples_leaf: 2,
            min_samples_split: 2,
            max_features: None,
            seed: 42,
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.n_trees == 0 {
            return Err("n_trees must be at least 1".to_string());
        }
        if self.max_depth == 0 {
            return Err("max_depth must be at least 1".to_string());
        }
        if self.min_samples_leaf == 0 {
            return Err("min_samples_leaf must be at least 1".to_string());
        }
        if self.min_samples_split < 2 {
            return Err("min_samples_split must be at least 2".to_string());
        }
        if self.max_features == Some(0) {
            return Err("max_features must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = ForestParams::default();
        assert_eq!(params.n_trees, 100);
        assert_eq!(params.max_depth, 18);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_params() {
        let params = ForestParams {
            n_trees: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = ForestParams {
            min_samples_split: 1,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_criterion_parsing() {
        let c: SplitCriterion = serde_json::from_str("\"squared_error\"").unwrap();
        assert_eq!(c, SplitCriterion::SquaredError);
        assert!(serde_json::from_str::<SplitCriterion>("\"poisson\"").is_err());
    }
}

//! Training configuration loaded from TOML.
//!
//! ```toml
//! [columns]
//! ordinal = ["Doors", "Year", "Owner_Count"]
//!
//! [forest]
//! n_trees = 100
//! max_depth = 18
//!
//! [split]
//! test_size = 0.2
//! seed = 0
//! ```
//!
//! Every section and field is optional.

use crate::domain::car::ColumnSpec;
use crate::domain::ml::ForestParams;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub test_size: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub columns: ColumnSpec,
    pub forest: ForestParams,
    pub split: SplitConfig,
}

impl TrainingConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse training config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read training config {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Invalid training config {:?}", path))
    }

    /// Missing file falls back to defaults; an unreadable or invalid one is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Training config {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn validate(&self) -> Result<()> {
        self.columns
            .validate()
            .context("Invalid [columns] section")?;
        let columns = &self.columns;
        if columns.ordinal.is_empty()
            && columns.categorical.is_empty()
            && columns.numeric.is_empty()
        {
            bail!("Invalid [columns] section: at least one column must be listed");
        }
        if let Err(reason) = self.forest.validate() {
            bail!("Invalid [forest] section: {}", reason);
        }
        if !(self.split.test_size > 0.0 && self.split.test_size < 1.0) {
            bail!(
                "Invalid [split] section: test_size must be in (0, 1), got {}",
                self.split.test_size
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::SplitCriterion;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = TrainingConfig::from_toml("").unwrap();
        assert_eq!(config, TrainingConfig::default());
        assert_eq!(config.forest.n_trees, 100);
        assert_eq!(config.forest.max_depth, 18);
        assert_eq!(config.split.test_size, 0.2);
        assert_eq!(config.columns, ColumnSpec::default());
    }

    #[test]
    fn test_partial_sections_override() {
        let config = TrainingConfig::from_toml(
            r#"
            [forest]
            n_trees = 25
            criterion = "squared_error"

            [split]
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.forest.n_trees, 25);
        assert_eq!(config.forest.max_depth, 18);
        assert_eq!(config.forest.criterion, SplitCriterion::SquaredError);
        assert_eq!(config.split.seed, 7);
        assert_eq!(config.split.test_size, 0.2);
    }

    #[test]
    fn test_unsupported_criterion_rejected() {
        let result = TrainingConfig::from_toml("[forest]\ncriterion = \"poisson\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(TrainingConfig::from_toml("[forest]\nn_trees = 0\n").is_err());
        assert!(TrainingConfig::from_toml("[split]\ntest_size = 1.5\n").is_err());
        assert!(
            TrainingConfig::from_toml("[columns]\nnumeric = [\"Brand\"]\ncategorical = [\"Brand\"]\n")
                .is_err()
        );
    }

    #[test]
    fn test_empty_columns_rejected() {
        let err = TrainingConfig::from_toml("[columns]\nordinal = []\ncategorical = []\nnumeric = []\n")
            .unwrap_err();
        assert!(format!("{:#}", err).contains("at least one column"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = TrainingConfig::load_or_default(Path::new("/nonexistent/training.toml")).unwrap();
        assert_eq!(config, TrainingConfig::default());
    }
}

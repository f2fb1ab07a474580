//! Dataset locations.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DataEnvConfig {
    pub raw_data_path: PathBuf,
    pub train_data_path: PathBuf,
    pub test_data_path: PathBuf,
}

impl Default for DataEnvConfig {
    fn default() -> Self {
        Self {
            raw_data_path: PathBuf::from("data/car_price_dataset.csv"),
            train_data_path: PathBuf::from("data/train.csv"),
            test_data_path: PathBuf::from("data/test.csv"),
        }
    }
}

impl DataEnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            raw_data_path: env::var("RAW_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.raw_data_path),
            train_data_path: env::var("TRAIN_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.train_data_path),
            test_data_path: env::var("TEST_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.test_data_path),
        }
    }
}

//! Splits the raw listings CSV into train and test files.
//!
//! # Usage
//! ```sh
//! cargo run --bin split -- --input data/car_price_dataset.csv
//! ```
//!
//! # Environment Variables
//! - `RAW_DATA_PATH`, `TRAIN_DATA_PATH`, `TEST_DATA_PATH` - default file locations
//! - `TRAINING_CONFIG` - TOML file holding the `[split]` section

use anyhow::Result;
use carprice::application::dataset::{load_listings, train_test_split, write_listings};
use carprice::config::Config;
use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw dataset CSV (defaults to RAW_DATA_PATH)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output train CSV (defaults to TRAIN_DATA_PATH)
    #[arg(long)]
    train: Option<PathBuf>,

    /// Output test CSV (defaults to TEST_DATA_PATH)
    #[arg(long)]
    test: Option<PathBuf>,

    /// Fraction of rows held out (overrides [split].test_size)
    #[arg(long)]
    test_size: Option<f64>,

    /// Shuffle seed (overrides [split].seed)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let input = args.input.unwrap_or(config.data.raw_data_path);
    let train_path = args.train.unwrap_or(config.data.train_data_path);
    let test_path = args.test.unwrap_or(config.data.test_data_path);
    let test_size = args.test_size.unwrap_or(config.training.split.test_size);
    let seed = args.seed.unwrap_or(config.training.split.seed);

    let listings = load_listings(&input)?;
    let split = train_test_split(&listings, test_size, seed)?;

    write_listings(&train_path, &split.train)?;
    write_listings(&test_path, &split.test)?;

    info!(
        "Split {} rows: {} train -> {:?}, {} test -> {:?}",
        listings.len(),
        split.train.len(),
        train_path,
        split.test.len(),
        test_path
    );
    Ok(())
}

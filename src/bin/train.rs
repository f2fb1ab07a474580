//! Fits the encoder and random forest, scores the test split and writes the
//! pipeline artifact.
//!
//! # Usage
//! ```sh
//! cargo run --release --bin train -- --export-cases 10
//! ```
//!
//! # Environment Variables
//! - `TRAIN_DATA_PATH`, `TEST_DATA_PATH` - input CSVs
//! - `PIPELINE_PATH` - artifact output
//! - `TRAINING_CONFIG` - TOML with `[columns]`, `[forest]`, `[split]`

use anyhow::{Context, Result};
use carprice::application::dataset::load_listings;
use carprice::application::ml::evaluation::write_case;
use carprice::application::ml::{PipelineTrainer, TrainedPipelineState};
use carprice::config::{Config, TrainingConfig};
use carprice::domain::car::CarListing;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Training config TOML (defaults to TRAINING_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Train CSV (defaults to TRAIN_DATA_PATH)
    #[arg(long)]
    train: Option<PathBuf>,

    /// Test CSV (defaults to TEST_DATA_PATH)
    #[arg(long)]
    test: Option<PathBuf>,

    /// Artifact output path (defaults to PIPELINE_PATH)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write this many test rows as holdout cases
    #[arg(long, default_value_t = 0)]
    export_cases: usize,

    /// Directory for exported holdout cases
    #[arg(long, default_value = "tests/cases")]
    cases_dir: PathBuf,
}

fn export_cases(
    state: &TrainedPipelineState,
    test: &[CarListing],
    predictions: &[f64],
    count: usize,
    dir: &Path,
) -> Result<usize> {
    let mut written = 0;
    for (i, (listing, prediction)) in test.iter().zip(predictions).take(count).enumerate() {
        write_case(dir, &format!("test_{}", i), &listing.features(), *prediction)?;
        written += 1;
    }
    info!(
        "Exported {} holdout cases to {:?} (format v{})",
        written, dir, state.format_version
    );
    Ok(written)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let (training, training_source) = match &args.config {
        Some(path) => (TrainingConfig::from_file(path)?, path.clone()),
        None => (config.training.clone(), config.training_config_path.clone()),
    };
    let train_path = args.train.unwrap_or(config.data.train_data_path);
    let test_path = args.test.unwrap_or(config.data.test_data_path);
    let output = args.output.unwrap_or(config.service.pipeline_path);

    let train = load_listings(&train_path)?;
    let test = load_listings(&test_path)?;

    let trainer = PipelineTrainer::from_config(&training);
    info!(
        "Training on {} rows ({} test rows), {} trees, max depth {}",
        train.len(),
        test.len(),
        trainer.params().n_trees,
        trainer.params().max_depth
    );
    let (state, report) = trainer
        .train_and_evaluate(&train, &test)
        .context("Training failed")?;

    state.save(&output)?;

    println!("\n══════════════════════════════════════════════════════");
    println!("  TRAINING SUMMARY");
    println!("══════════════════════════════════════════════════════");
    println!("  Train rows:      {}", report.train_rows);
    println!("  Test rows:       {}", report.test_rows);
    println!("  Feature columns: {}", report.n_columns);
    match &report.evaluation.metrics {
        Some(metrics) => {
            println!("  R2 Score:        {:.4}", metrics.r2);
            println!("  RMSE:            {:.2}", metrics.rmse);
            println!("  MAE:             {:.2}", metrics.mae);
        }
        None => println!("  No test rows scored"),
    }
    println!("  Config:          {:?}", training_source);
    println!("  Artifact:        {:?}", output);
    println!("══════════════════════════════════════════════════════\n");

    if args.export_cases > 0 {
        export_cases(
            &state,
            &test,
            &report.evaluation.predictions,
            args.export_cases,
            &args.cases_dir,
        )?;
    }

    Ok(())
}

//! Predicts the price of one car from a JSON row.
//!
//! # Usage
//! ```sh
//! cargo run --bin predict -- '{"Doors": 4, "Year": 2019, "Owner_Count": 1, "Brand": "BMW",
//!   "Model": "X5", "Fuel_Type": "Diesel", "Transmission": "Automatic",
//!   "Engine_Size": 3.0, "Mileage": 45000}'
//! ```
//!
//! # Environment Variables
//! - `PIPELINE_PATH` - artifact to serve (default: experiments/rand_forest_pipeline.json)
//! - `DATABASE_URL` - SQLite URL; when set, predictions are recorded
//! - `RECORD_PREDICTIONS` - set to `false` to skip recording

use anyhow::{Context, Result};
use carprice::application::ml::{PredictionService, PricePredictor};
use carprice::application::recording::{PredictionRecorder, RecordOutcome};
use carprice::config::Config;
use carprice::domain::car::FeatureRow;
use carprice::domain::repositories::ResultStore;
use carprice::infrastructure::{Database, SqliteResultStore};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Feature row as a JSON object
    #[arg(conflicts_with = "file")]
    json: Option<String>,

    /// Read the JSON row from a file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Artifact path (defaults to PIPELINE_PATH)
    #[arg(long)]
    pipeline: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let body = match (&args.json, &args.file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?
        }
        (None, None) => anyhow::bail!("Provide a JSON row or --file"),
    };
    let value: serde_json::Value = serde_json::from_str(&body).context("Request is not valid JSON")?;
    let row = FeatureRow::from_json(&value)?;

    let pipeline_path = args.pipeline.unwrap_or(config.service.pipeline_path.clone());
    let service = PredictionService::load(&pipeline_path)?;
    info!(
        "Serving {} {} from {:?} ({} columns, trained {})",
        service.name(),
        service.version(),
        pipeline_path,
        service.state().schema().len(),
        service.state().metadata.trained_at
    );

    let store: Option<Arc<dyn ResultStore>> = match config.service.recording_url() {
        Some(url) => match Database::new(url).await {
            Ok(db) => Some(Arc::new(SqliteResultStore::new(db)) as Arc<dyn ResultStore>),
            Err(e) => {
                warn!("Result store unavailable, predictions will not be recorded: {:#}", e);
                None
            }
        },
        None => None,
    };

    let recorder = PredictionRecorder::new(Arc::new(service), store);
    let outcome = recorder.predict_and_record(row).await?;

    match &outcome.record {
        RecordOutcome::Stored(id) => info!("Recorded as {}", id),
        RecordOutcome::Skipped => info!("Recording disabled"),
        RecordOutcome::Failed(reason) => warn!("Not recorded: {}", reason),
    }

    println!("{}", serde_json::json!({ "prediction": outcome.prediction }));
    Ok(())
}

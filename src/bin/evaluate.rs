//! Replays recorded holdout cases against the current artifact, and
//! optionally scores it on a labelled test CSV.
//!
//! Exits with an error when any case drifts outside the tolerance or when
//! the test-set R2 falls below `--min-r2`.
//!
//! # Usage
//! ```sh
//! cargo run --bin evaluate -- --cases tests/cases --tolerance 0.01
//! cargo run --bin evaluate -- --test-csv data/test.csv --min-r2 0.8
//! ```

use anyhow::{Result, bail};
use carprice::application::dataset::load_listings;
use carprice::application::ml::evaluation::{
    DEFAULT_REL_TOL, evaluate_cases, load_cases, score_listings,
};
use carprice::application::ml::{PredictionService, PricePredictor};
use carprice::config::Config;
use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory of `*.json` holdout cases
    #[arg(long, default_value = "tests/cases")]
    cases: PathBuf,

    /// Skip case replay and only score the test CSV
    #[arg(long)]
    skip_cases: bool,

    /// Labelled CSV to score the artifact against
    #[arg(long)]
    test_csv: Option<PathBuf>,

    /// Fail when the test CSV R2 is below this value
    #[arg(long, requires = "test_csv")]
    min_r2: Option<f64>,

    /// Relative tolerance between served and recorded predictions
    #[arg(long, default_value_t = DEFAULT_REL_TOL)]
    tolerance: f64,

    /// Artifact path (defaults to PIPELINE_PATH)
    #[arg(long)]
    pipeline: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let pipeline_path = args.pipeline.unwrap_or(config.service.pipeline_path);
    let service = PredictionService::load(&pipeline_path)?;
    info!(
        "Evaluating {} {} from {:?}",
        service.name(),
        service.version(),
        pipeline_path
    );

    if let Some(test_csv) = &args.test_csv {
        let listings = load_listings(test_csv)?;
        let metrics = score_listings(service.state(), &listings, args.min_r2)?;
        println!("\n  Test CSV: {:?}", test_csv);
        println!("  Rows:     {}", metrics.samples);
        println!("  R2 Score: {:.4}", metrics.r2);
        println!("  RMSE:     {:.2}", metrics.rmse);
        println!("  MAE:      {:.2}", metrics.mae);
    }

    if args.skip_cases {
        return Ok(());
    }

    let cases = load_cases(&args.cases)?;
    if cases.is_empty() {
        bail!("No holdout cases found in {:?}", args.cases);
    }
    info!("Evaluating {} cases from {:?}", cases.len(), args.cases);

    let report = evaluate_cases(&service, &cases, args.tolerance)?;

    println!("\n  Cases:    {}", report.cases.len());
    println!("  R2 Score: {:.4}", report.r2);

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        for case in &failures {
            println!(
                "  DRIFT {:?}: predicted {:.2}, expected {:.2}",
                case.source, case.predicted, case.expected
            );
        }
        bail!(
            "{} of {} cases outside tolerance {}",
            failures.len(),
            report.cases.len(),
            args.tolerance
        );
    }

    println!("  All cases within tolerance {}\n", args.tolerance);
    Ok(())
}

mod common;

use carprice::application::dataset::{load_listings, train_test_split, write_listings};
use carprice::application::ml::evaluation::{
    DEFAULT_REL_TOL, evaluate_cases, load_cases, score_listings, write_case,
};
use carprice::application::ml::{
    PipelineTrainer, PredictionService, PricePredictor, TrainedPipelineState, TrainingReport,
};
use carprice::domain::car::{CarListing, ColumnSpec};
use carprice::domain::errors::PipelineError;
use common::{bmw_x5, synthetic_listings, temp_dir, test_params};
use serde_json::json;
use std::path::PathBuf;
use std::sync::OnceLock;

struct Trained {
    state: TrainedPipelineState,
    report: TrainingReport,
    test: Vec<CarListing>,
    raw: PathBuf,
    artifact: PathBuf,
}

fn trained() -> &'static Trained {
    static TRAINED: OnceLock<Trained> = OnceLock::new();
    TRAINED.get_or_init(|| {
        let dir = temp_dir("carprice_flow");
        let raw = dir.join("raw.csv");
        write_listings(&raw, &synthetic_listings(600, 7)).unwrap();

        let listings = load_listings(&raw).unwrap();
        let split = train_test_split(&listings, 0.2, 0).unwrap();
        assert_eq!(split.test.len(), 120);

        let trainer = PipelineTrainer::new(ColumnSpec::default(), test_params());
        let (state, report) = trainer.train_and_evaluate(&split.train, &split.test).unwrap();

        let artifact = dir.join("experiments").join("rand_forest_pipeline.json");
        state.save(&artifact).unwrap();

        Trained {
            state,
            report,
            test: split.test,
            raw,
            artifact,
        }
    })
}

#[test]
fn test_holdout_r2_is_high() {
    let trained = trained();
    let metrics = trained.report.evaluation.metrics.as_ref().unwrap();
    assert_eq!(metrics.samples, 120);
    assert!(metrics.r2 >= 0.8, "R2 Score too low: {:.4}", metrics.r2);
    assert_eq!(trained.state.metadata.evaluation.as_ref(), Some(metrics));
}

#[test]
fn test_loaded_artifact_reproduces_evaluation() {
    let trained = trained();
    let service = PredictionService::load(&trained.artifact).unwrap();
    assert_eq!(service.state().schema(), trained.state.schema());

    let rows: Vec<_> = trained.test.iter().map(|l| l.features()).collect();
    let batch = service.predict_batch(&rows).unwrap();
    assert_eq!(batch, trained.report.evaluation.predictions);

    for (row, expected) in rows.iter().zip(&batch).take(10) {
        assert_eq!(service.predict(row).unwrap(), *expected);
    }
}

#[test]
fn test_bmw_x5_prediction_is_stable() {
    let trained = trained();
    let service = PredictionService::load(&trained.artifact).unwrap();

    let first = service.predict(&bmw_x5()).unwrap();
    assert!(first.is_finite() && first > 0.0);
    assert_eq!(service.predict(&bmw_x5()).unwrap(), first);

    let from_json = service
        .predict_json(&json!({
            "Doors": 4, "Year": 2019, "Owner_Count": 1, "Brand": "BMW", "Model": "X5",
            "Fuel_Type": "Diesel", "Transmission": "Automatic",
            "Engine_Size": 3.0, "Mileage": 45000, "Color": "Black"
        }))
        .unwrap();
    assert_eq!(from_json, first);

    // Same data, same seed
    let listings = load_listings(&trained.raw).unwrap();
    let split = train_test_split(&listings, 0.2, 0).unwrap();
    let retrained = PipelineTrainer::new(ColumnSpec::default(), test_params())
        .train(&split.train)
        .unwrap();
    let again = PredictionService::from_state(retrained)
        .predict(&bmw_x5())
        .unwrap();
    assert_eq!(again, first);
}

#[test]
fn test_unseen_brand_is_served() {
    let trained = trained();
    let service = PredictionService::load(&trained.artifact).unwrap();
    let mut row = bmw_x5();
    row.brand = "Lada".to_string();
    row.model = "Niva".to_string();
    row.year = 1990;
    assert!(service.predict(&row).unwrap().is_finite());
}

#[test]
fn test_invalid_request_is_client_error() {
    let trained = trained();
    let service = PredictionService::load(&trained.artifact).unwrap();
    let err = service
        .predict_json(&json!({"Doors": "four", "Year": 2019}))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
    assert!(err.is_client_error());
}

#[test]
fn test_recorded_holdout_cases_stay_within_tolerance() {
    let trained = trained();
    let cases_dir = temp_dir("carprice_cases");
    for (i, (listing, prediction)) in trained
        .test
        .iter()
        .zip(&trained.report.evaluation.predictions)
        .take(10)
        .enumerate()
    {
        write_case(&cases_dir, &format!("test_{}", i), &listing.features(), *prediction).unwrap();
    }

    let service = PredictionService::load(&trained.artifact).unwrap();
    let cases = load_cases(&cases_dir).unwrap();
    assert_eq!(cases.len(), 10);

    let report = evaluate_cases(&service, &cases, DEFAULT_REL_TOL).unwrap();
    assert!(report.all_within_tolerance());
    assert!(report.r2 > 0.999);

    std::fs::remove_dir_all(cases_dir).ok();
}

#[test]
fn test_test_csv_score_gate() {
    let trained = trained();
    let dir = temp_dir("carprice_test_csv");
    let test_csv = dir.join("test.csv");
    write_listings(&test_csv, &trained.test).unwrap();
    let service = PredictionService::load(&trained.artifact).unwrap();
    let listings = load_listings(&test_csv).unwrap();

    let metrics = score_listings(service.state(), &listings, Some(0.8)).unwrap();
    assert_eq!(Some(&metrics), trained.report.evaluation.metrics.as_ref());

    let err = score_listings(service.state(), &listings, Some(0.999_999)).unwrap_err();
    assert!(err.to_string().contains("below the required"));
    assert!(score_listings(service.state(), &[], None).is_err());

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_corrupt_artifact_refuses_to_load() {
    let dir = temp_dir("carprice_corrupt");
    let path = dir.join("pipeline.json");
    std::fs::write(&path, "{\"format_version\": 1, \"encoder\": ").unwrap();
    let err = PredictionService::load(&path).unwrap_err();
    assert!(matches!(err, PipelineError::StateLoad { .. }));
    std::fs::remove_dir_all(dir).ok();
}

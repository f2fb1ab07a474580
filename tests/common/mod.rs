#![allow(dead_code)]

use carprice::domain::car::{CarListing, FeatureRow};
use carprice::domain::ml::ForestParams;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

const CATALOG: &[(&str, f64, &[(&str, f64)])] = &[
    ("Toyota", 9_000.0, &[("Corolla", 0.0), ("Camry", 1_500.0), ("RAV4", 2_500.0)]),
    ("BMW", 14_000.0, &[("3 Series", 0.0), ("5 Series", 1_500.0), ("X5", 2_500.0)]),
    ("Audi", 13_000.0, &[("A4", 0.0), ("A6", 1_500.0), ("Q5", 2_500.0)]),
    ("Ford", 7_000.0, &[("Fiesta", 0.0), ("Focus", 1_000.0), ("Explorer", 2_500.0)]),
];

const FUELS: &[(&str, f64)] = &[
    ("Petrol", 0.0),
    ("Diesel", 800.0),
    ("Hybrid", 2_000.0),
    ("Electric", 3_500.0),
];

const TRANSMISSIONS: &[(&str, f64)] = &[
    ("Manual", 0.0),
    ("Automatic", 1_200.0),
    ("Semi-Automatic", 600.0),
];

/// Listing whose price is a smooth function of its features plus small noise.
pub fn synthetic_listings(n: usize, seed: u64) -> Vec<CarListing> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let (brand, brand_base, models) = CATALOG.choose(&mut rng).copied().unwrap();
            let (model, model_adj) = *models.choose(&mut rng).unwrap();
            let (fuel, fuel_adj) = *FUELS.choose(&mut rng).unwrap();
            let (transmission, transmission_adj) = *TRANSMISSIONS.choose(&mut rng).unwrap();

            let year: i64 = rng.random_range(2005..=2023);
            let mileage = (rng.random_range(0.0..250_000.0_f64)).round();
            let engine_size = (rng.random_range(10..=50) as f64) / 10.0;
            let doors: i64 = *[2_i64, 3, 4, 5].choose(&mut rng).unwrap();
            let owner_count: i64 = rng.random_range(1..=5);

            let noise = rng.random_range(-150.0..150.0);
            let price = brand_base
                + model_adj
                + fuel_adj
                + transmission_adj
                + (year - 2005) as f64 * 1_200.0
                - mileage * 0.04
                + engine_size * 800.0
                - (owner_count - 1) as f64 * 250.0
                + noise;

            let row = FeatureRow {
                doors,
                year,
                owner_count,
                brand: brand.to_string(),
                model: model.to_string(),
                fuel_type: fuel.to_string(),
                transmission: transmission.to_string(),
                engine_size,
                mileage,
            };
            CarListing::from_parts(row, price.max(2_000.0).round())
        })
        .collect()
}

pub fn bmw_x5() -> FeatureRow {
    FeatureRow {
        doors: 4,
        year: 2019,
        owner_count: 1,
        brand: "BMW".to_string(),
        model: "X5".to_string(),
        fuel_type: "Diesel".to_string(),
        transmission: "Automatic".to_string(),
        engine_size: 3.0,
        mileage: 45_000.0,
    }
}

/// Small forest so the suite stays fast.
pub fn test_params() -> ForestParams {
    ForestParams {
        n_trees: 40,
        max_depth: 12,
        ..Default::default()
    }
}

static DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn temp_dir(prefix: &str) -> PathBuf {
    let unique_id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "{}_{}_{}",
        prefix,
        std::process::id(),
        unique_id
    ));
    std::fs::create_dir_all(&dir).expect("Failed to create test temp dir");
    dir
}

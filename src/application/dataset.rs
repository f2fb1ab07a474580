//! Listing CSV files and the seeded train/test split.

use crate::domain::car::CarListing;
use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct DatasetSplit {
    pub train: Vec<CarListing>,
    pub test: Vec<CarListing>,
}

pub fn load_listings(path: &Path) -> Result<Vec<CarListing>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open listing file {:?}", path))?;
    let mut rdr = csv::Reader::from_reader(BufReader::new(file));

    let mut listings = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let listing: CarListing = result
            .with_context(|| format!("Invalid listing at record {} in {:?}", line + 1, path))?;
        listings.push(listing);
    }

    info!("Loaded {} listings from {:?}", listings.len(), path);
    Ok(listings)
}

pub fn write_listings(path: &Path, listings: &[CarListing]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("Failed to create data directory")?;
    }

    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create listing file {:?}", path))?;
    for listing in listings {
        wtr.serialize(listing).context("Failed to serialize listing")?;
    }
    wtr.flush().context("Failed to flush listing file")?;

    info!("{:?} is saved ({} rows)", path, listings.len());
    Ok(())
}

/// Shuffles with a seeded RNG and moves `ceil(n * test_size)` rows to the test side.
pub fn train_test_split(listings: &[CarListing], test_size: f64, seed: u64) -> Result<DatasetSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        bail!("test_size must be in (0, 1), got {}", test_size);
    }

    let n = listings.len();
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        bail!(
            "Cannot split {} rows with test_size {}: one side would be empty",
            n,
            test_size
        );
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    let pick = |idx: &[usize]| idx.iter().map(|&i| listings[i].clone()).collect::<Vec<_>>();

    Ok(DatasetSplit {
        train: pick(train_idx),
        test: pick(test_idx),
    })
}

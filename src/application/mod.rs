// Listing files and the train/test split
pub mod dataset;

// Training, artifact persistence and serving
pub mod ml;

// Compute-then-record prediction flow
pub mod recording;

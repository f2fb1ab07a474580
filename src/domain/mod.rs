// Car listing and feature row types
pub mod car;

// Encoding, schema and regression metrics
pub mod ml;

// Served prediction records
pub mod prediction;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;

pub mod database;
pub mod prediction_repository;

pub use database::Database;
pub use prediction_repository::SqliteResultStore;

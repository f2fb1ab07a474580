pub mod persistence;
pub mod repositories;

pub use persistence::{Database, SqliteResultStore};
pub use repositories::InMemoryResultStore;

//! Repository abstractions for prediction results.
//!
//! The store is append-only: records are saved and read back, never updated
//! or deleted.
//!
//! # Implementations
//!
//! - `InMemoryResultStore`: `Arc<RwLock>` backed, for tests and single-process runs
//! - `SqliteResultStore`: durable storage through sqlx

use crate::domain::car::FeatureRow;
use crate::domain::prediction::PredictionRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Repository for served predictions
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Append a record
    async fn save(&self, record: &PredictionRecord) -> Result<()>;

    /// Find the oldest record whose input equals `input`
    async fn find_by_input(&self, input: &FeatureRow) -> Result<Option<PredictionRecord>>;

    /// Most recent records first
    async fn find_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>>;

    async fn count(&self) -> Result<usize>;
}

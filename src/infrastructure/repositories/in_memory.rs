//! In-memory result store.
//!
//! Records live in an `Arc<RwLock<Vec<_>>>` and are lost when the process
//! exits. Queries order by timestamp, then by insertion order, like the
//! SQLite store.

use crate::domain::car::FeatureRow;
use crate::domain::prediction::PredictionRecord;
use crate::domain::repositories::ResultStore;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct InMemoryResultStore {
    records: Arc<RwLock<Vec<PredictionRecord>>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryResultStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn save(&self, record: &PredictionRecord) -> Result<()> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn find_by_input(&self, input: &FeatureRow) -> Result<Option<PredictionRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.input == *input)
            .min_by_key(|r| r.timestamp)
            .cloned())
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        let records = self.records.read().await;
        let mut ordered: Vec<(usize, &PredictionRecord)> = records.iter().enumerate().collect();
        ordered.sort_by(|(ia, a), (ib, b)| b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia)));
        Ok(ordered
            .into_iter()
            .take(limit)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}

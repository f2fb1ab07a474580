use crate::domain::car::FeatureRow;
use crate::domain::prediction::PredictionRecord;
use crate::domain::repositories::ResultStore;
use crate::infrastructure::persistence::database::Database;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tracing::debug;

/// Predictions table keyed by record id.
///
/// Inputs are stored as their canonical JSON, which is also the lookup key
/// for `find_by_input`. Timestamps are fixed-width RFC 3339 so that text
/// ordering matches time ordering.
pub struct SqliteResultStore {
    database: Database,
}

impl SqliteResultStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn input_key(input: &FeatureRow) -> Result<String> {
        serde_json::to_string(input).context("Failed to serialize prediction input")
    }

    fn map_row(row: &SqliteRow) -> Result<PredictionRecord> {
        let input_json: String = row.try_get("input_json")?;
        let timestamp: String = row.try_get("timestamp")?;
        Ok(PredictionRecord {
            id: row.try_get("id")?,
            input: serde_json::from_str(&input_json).context("Corrupt stored input")?,
            prediction: row.try_get("prediction")?,
            timestamp: DateTime::parse_from_rfc3339(&timestamp)
                .with_context(|| format!("Corrupt stored timestamp: {}", timestamp))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl ResultStore for SqliteResultStore {
    async fn save(&self, record: &PredictionRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO predictions (id, input_json, prediction, timestamp)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(Self::input_key(&record.input)?)
        .bind(record.prediction)
        .bind(record.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.database.pool)
        .await
        .context("Failed to save prediction")?;

        debug!("Persisted prediction {}", record.id);
        Ok(())
    }

    async fn find_by_input(&self, input: &FeatureRow) -> Result<Option<PredictionRecord>> {
        let row = sqlx::query(
            "SELECT * FROM predictions WHERE input_json = ? ORDER BY timestamp ASC, rowid ASC LIMIT 1",
        )
        .bind(Self::input_key(input)?)
        .fetch_optional(&self.database.pool)
        .await
        .context("Failed to query predictions")?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        let rows = sqlx::query("SELECT * FROM predictions ORDER BY timestamp DESC, rowid DESC LIMIT ?")
            .bind(limit as i64)
            .fetch_all(&self.database.pool)
            .await
            .context("Failed to query predictions")?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn count(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM predictions")
            .fetch_one(&self.database.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count as usize)
    }
}

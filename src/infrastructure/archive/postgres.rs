//! PostgreSQL mapping archive

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use crate::domain::archive::{ArchivedMapping, MappingArchive};
use crate::domain::DomainError;

/// PostgreSQL archive configuration
#[derive(Debug, Clone)]
pub struct PostgresArchiveConfig {
    pub url: String,
    pub table: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl PostgresArchiveConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            table: "mappings_v3".to_string(),
            max_connections: 5,
            connect_timeout_secs: 30,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Archive storing one row per instrument in a JSONB table
///
/// Rows are keyed by `(id, figi)`; re-archiving the same instrument replaces
/// its payload.
pub struct PostgresMappingArchive {
    pool: PgPool,
    table: String,
}

impl Debug for PostgresMappingArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresMappingArchive")
            .field("table", &self.table)
            .finish()
    }
}

impl PostgresMappingArchive {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// Connects a pool and makes sure the archive table exists
    pub async fn connect(config: &PostgresArchiveConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        let archive = Self::new(pool, &config.table);
        archive.ensure_table().await?;
        Ok(archive)
    }

    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id VARCHAR(255) NOT NULL,
                figi VARCHAR(32) NOT NULL DEFAULT '',
                payload JSONB NOT NULL,
                archived_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (id, figi)
            )
            "#,
            self.table
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl MappingArchive for PostgresMappingArchive {
    async fn store(&self, records: Vec<ArchivedMapping>) -> Result<usize, DomainError> {
        let query = format!(
            r#"
            INSERT INTO {} (id, figi, payload, archived_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (id, figi) DO UPDATE
            SET payload = EXCLUDED.payload, archived_at = EXCLUDED.archived_at
            "#,
            self.table
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        for record in &records {
            sqlx::query(&query)
                .bind(&record.id)
                .bind(record.figi.as_deref().unwrap_or_default())
                .bind(serde_json::Value::Object(record.payload.clone()))
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to archive mapping: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit archive batch: {}", e)))?;

        Ok(records.len())
    }

    async fn find_by_id(&self, id: &str) -> Result<Vec<ArchivedMapping>, DomainError> {
        let query = format!(
            "SELECT id, figi, payload FROM {} WHERE id = $1 ORDER BY figi",
            self.table
        );

        let rows = sqlx::query(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to query archive: {}", e)))?;

        rows.into_iter()
            .map(|row| {
                let figi: String = row.get("figi");
                let payload = match row.get::<serde_json::Value, _>("payload") {
                    serde_json::Value::Object(payload) => payload,
                    other => {
                        return Err(DomainError::storage(format!(
                            "Archived payload is not an object: {}",
                            other
                        )))
                    }
                };

                Ok(ArchivedMapping {
                    id: row.get("id"),
                    figi: (!figi.is_empty()).then_some(figi),
                    payload,
                })
            })
            .collect()
    }
}

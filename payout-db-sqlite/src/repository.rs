use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use payout_core::{SlotStore, StorageError};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

/// [`SlotStore`] backed by a single SQLite `slots` table.
pub struct SqliteSlotStore {
    pool: SqlitePool,
}

impl SqliteSlotStore {
    /// Opens `connection_string`, creating the database file if missing.
    ///
    /// Accepts a bare path (`payouts.db`), a sqlx URL
    /// (`sqlite:payouts.db?mode=rwc`) or `:memory:`.
    pub async fn new(connection_string: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(connection_string)
            .with_context(|| format!("Invalid SQLite connection string: {}", connection_string))?
            .create_if_missing(true);

        // One long-lived connection: there is a single writer, and an
        // in-memory database lives only as long as its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", connection_string))?;
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SlotStore for SqliteSlotStore {
    async fn read_slot(
        &self,
        key: &str,
    ) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM slots WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        debug!(key, present = row.is_some(), "read slot");
        row.map(|row| {
            row.try_get("value")
                .map_err(|e| StorageError::Backend(format!("Failed to get value of '{}': {}", key, e)))
        })
        .transpose()
    }

    async fn write_slot(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        sqlx::query(
            "INSERT INTO slots (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Backend(e.to_string()))?;

        debug!(key, bytes = value.len(), "wrote slot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    async fn setup_test_db() -> SqliteSlotStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let store = SqliteSlotStore::new_with_pool(pool);
        store
            .run_migrations()
            .await
            .expect("Failed to run migrations");
        store
    }

    #[tokio::test]
    async fn test_read_absent_slot() {
        let store = setup_test_db().await;

        let value = store.read_slot("amounts").await;

        assert_eq!(value, Ok(None));
    }

    #[tokio::test]
    async fn test_write_then_read_slot() {
        let store = setup_test_db().await;

        store
            .write_slot("amounts", r#"["5000"]"#)
            .await
            .expect("Should write slot");

        let value = store.read_slot("amounts").await;
        assert_eq!(value, Ok(Some(r#"["5000"]"#.to_string())));
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_value() {
        let store = setup_test_db().await;

        store.write_slot("amounts", r#"["5000"]"#).await.unwrap();
        store.write_slot("amounts", "[]").await.unwrap();

        assert_eq!(store.read_slot("amounts").await, Ok(Some("[]".to_string())));

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM slots")
            .fetch_one(store.pool())
            .await
            .unwrap()
            .get("n");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_slots_are_independent() {
        let store = setup_test_db().await;

        store.write_slot("amounts", "[\"1\"]").await.unwrap();
        store.write_slot("results", "[]").await.unwrap();

        assert_eq!(store.read_slot("amounts").await, Ok(Some("[\"1\"]".to_string())));
        assert_eq!(store.read_slot("results").await, Ok(Some("[]".to_string())));
    }

    #[tokio::test]
    async fn test_write_stamps_updated_at() {
        let store = setup_test_db().await;

        store.write_slot("results", "[]").await.unwrap();

        let updated_at: String = sqlx::query("SELECT updated_at FROM slots WHERE key = 'results'")
            .fetch_one(store.pool())
            .await
            .unwrap()
            .get("updated_at");
        assert!(
            chrono::NaiveDateTime::parse_from_str(&updated_at, "%Y-%m-%d %H:%M:%S").is_ok(),
            "unexpected timestamp format: {updated_at}"
        );
    }

    #[tokio::test]
    async fn test_write_without_migrations_fails() {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SqliteSlotStore::new_with_pool(pool);

        let result = store.write_slot("amounts", "[]").await;

        assert!(matches!(result, Err(StorageError::Backend(_))));
    }
}

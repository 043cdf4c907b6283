// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! SQLite-backed state storage
//!
//! The document is kept in a small key/value table so that other keys can
//! be added later without a migration.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Row, Sqlite};
use std::path::Path;
use tracing::debug;

use super::{StateStorage, StorageError};

const ROOT_KEY: &str = "root";

#[derive(Clone)]
pub struct SqliteStorage {
    pool: Pool<Sqlite>,
}

impl SqliteStorage {
    /// Connect and run migrations. File databases are created if missing.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let in_memory = database_url.contains(":memory:");

        let connection_options = if in_memory || database_url.contains('?') {
            database_url.to_string()
        } else {
            ensure_parent_dir(database_url).await?;
            format!("{database_url}?mode=rwc")
        };

        // one connection keeps an in-memory database alive across queries
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&connection_options)
            .await?;

        let storage = Self { pool };
        storage.migrate().await?;
        Ok(storage)
    }

    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

async fn ensure_parent_dir(database_url: &str) -> Result<(), StorageError> {
    let path = database_url
        .trim_start_matches("sqlite:")
        .trim_start_matches("//");

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        debug!(dir = %parent.display(), "Creating database directory");
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

#[async_trait]
impl StateStorage for SqliteStorage {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM app_state WHERE key = ?1")
            .bind(ROOT_KEY)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn save(&self, document: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO app_state (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(ROOT_KEY)
        .bind(document)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM app_state WHERE key = ?1")
            .bind(ROOT_KEY)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_single_row() {
        let storage = SqliteStorage::new("sqlite::memory:").await.unwrap();
        assert!(storage.load().await.unwrap().is_none());

        storage.save("first").await.unwrap();
        storage.save("second").await.unwrap();
        assert_eq!(storage.load().await.unwrap().as_deref(), Some("second"));

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM app_state")
            .fetch_one(&storage.pool)
            .await
            .unwrap()
            .get("n");
        assert_eq!(count, 1);

        storage.clear().await.unwrap();
        assert!(storage.load().await.unwrap().is_none());
    }
}

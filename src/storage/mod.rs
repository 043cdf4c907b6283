// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # State Persistence
//!
//! The state tree is stored as a single JSON document carrying a
//! `schema_version` and one key per slice. Backends only move that document
//! in and out; [`StatePersistor`] handles versioning and the slice whitelist.

pub mod json_file;
pub mod sqlite;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{StorageBackend, StorageConfig};
use crate::constants::service::SCHEMA_VERSION;
use crate::logging::AppLogger;
use crate::store::{AppState, Slice};

pub use json_file::JsonFileStorage;
pub use sqlite::SqliteStorage;

const SCHEMA_VERSION_KEY: &str = "schema_version";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Persisted state has schema version {found}, newest supported is {supported}")]
    UnsupportedSchema { found: u64, supported: u32 },
}

/// Raw document storage
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// The stored document, or `None` when nothing has been saved yet
    async fn load(&self) -> Result<Option<String>, StorageError>;

    async fn save(&self, document: &str) -> Result<(), StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;

    fn backend_name(&self) -> &'static str;
}

/// Loads and saves the state tree through a [`StateStorage`] backend
pub struct StatePersistor {
    storage: Box<dyn StateStorage>,
    whitelist: Vec<Slice>,
}

impl StatePersistor {
    pub fn new(storage: Box<dyn StateStorage>, whitelist: Vec<Slice>) -> Self {
        Self { storage, whitelist }
    }

    pub fn whitelist(&self) -> &[Slice] {
        &self.whitelist
    }

    pub fn backend_name(&self) -> &'static str {
        self.storage.backend_name()
    }

    /// Restore the state tree. Slices outside the whitelist start fresh.
    pub async fn rehydrate(&self) -> Result<AppState, StorageError> {
        let started = Instant::now();
        let document = self.storage.load().await;
        self.log_operation("load", document.is_ok(), started);

        let Some(document) = document? else {
            info!(backend = self.backend_name(), "No persisted state, starting fresh");
            return Ok(AppState::default());
        };

        let mut value: Value = serde_json::from_str(&document)?;
        let found = schema_version(&value);
        if found > u64::from(SCHEMA_VERSION) {
            return Err(StorageError::UnsupportedSchema {
                found,
                supported: SCHEMA_VERSION,
            });
        }
        if found < u64::from(SCHEMA_VERSION) {
            info!(from = found, to = SCHEMA_VERSION, "Upgrading persisted state layout");
        }

        // slices outside the whitelist are never parsed
        if let Value::Object(map) = &mut value {
            map.retain(|key, _| self.whitelist.iter().any(|slice| slice.as_str() == key));
        }
        let mut state: AppState = serde_json::from_value(value)?;
        state.schema_version = SCHEMA_VERSION;

        Ok(state)
    }

    /// Write the whitelisted slices of `state`
    pub async fn persist(&self, state: &AppState) -> Result<(), StorageError> {
        let mut value = serde_json::to_value(state)?;
        if let Value::Object(map) = &mut value {
            map.retain(|key, _| {
                key == SCHEMA_VERSION_KEY || self.whitelist.iter().any(|slice| slice.as_str() == key)
            });
        }
        let document = serde_json::to_string_pretty(&value)?;

        let started = Instant::now();
        let result = self.storage.save(&document).await;
        self.log_operation("save", result.is_ok(), started);
        result
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        let started = Instant::now();
        let result = self.storage.clear().await;
        self.log_operation("clear", result.is_ok(), started);
        result
    }

    fn log_operation(&self, operation: &str, success: bool, started: Instant) {
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_storage_operation(operation, self.backend_name(), success, duration_ms);
    }
}

/// Version field of a raw document; absent or malformed reads as 0
fn schema_version(value: &Value) -> u64 {
    value
        .get(SCHEMA_VERSION_KEY)
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// Open the configured backend
pub async fn create_storage(config: &StorageConfig) -> Result<Box<dyn StateStorage>, StorageError> {
    match config.backend {
        StorageBackend::Json => Ok(Box::new(JsonFileStorage::new(&config.location))),
        StorageBackend::Sqlite => Ok(Box::new(SqliteStorage::new(&config.location).await?)),
    }
}

pub async fn create_persistor(config: &StorageConfig) -> Result<StatePersistor, StorageError> {
    if config.persist.is_empty() {
        warn!("Persistence whitelist is empty");
    }
    let storage = create_storage(config).await?;
    Ok(StatePersistor::new(storage, config.persist.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_version_parsing() {
        assert_eq!(schema_version(&json!({"schema_version": 3})), 3);
        assert_eq!(schema_version(&json!({"onboarding": {}})), 0);
        assert_eq!(schema_version(&json!({"schema_version": "1"})), 0);
        assert_eq!(
            schema_version(&json!({"schema_version": 5_000_000_000_u64})),
            5_000_000_000
        );
    }
}

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based storage configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::constants::env_config;
use crate::store::Slice;

/// Which persistence backend holds the state tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Single JSON document on disk
    Json,
    /// Key/value row in a SQLite database
    Sqlite,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StorageBackend::Json),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(anyhow::anyhow!("Unknown storage backend '{}' (expected json or sqlite)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StorageConfigFile")]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// File path for `json`, database URL for `sqlite`
    pub location: String,
    /// Slices restored on startup; the rest start fresh
    pub persist: Vec<Slice>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Json,
            location: default_location(StorageBackend::Json),
            persist: Slice::ALL.to_vec(),
        }
    }
}

/// `[storage]` table as written; omitted keys fall back to defaults
#[derive(Deserialize)]
struct StorageConfigFile {
    #[serde(default = "default_backend")]
    backend: StorageBackend,
    location: Option<String>,
    persist: Option<Vec<Slice>>,
}

fn default_backend() -> StorageBackend {
    StorageBackend::Json
}

impl From<StorageConfigFile> for StorageConfig {
    fn from(file: StorageConfigFile) -> Self {
        Self {
            backend: file.backend,
            location: file.location.unwrap_or_else(|| default_location(file.backend)),
            persist: file.persist.unwrap_or_else(|| Slice::ALL.to_vec()),
        }
    }
}

impl StorageConfig {
    /// Load storage configuration from environment variables
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenv::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let backend: StorageBackend = env_config::storage_backend()
            .parse()
            .context("Invalid WELLNESS_STORAGE_BACKEND value")?;

        let location = env_config::storage_path().unwrap_or_else(|| default_location(backend));

        let persist = match env_config::persist_slices() {
            Some(raw) => parse_slices(&raw).context("Invalid WELLNESS_PERSIST_SLICES value")?,
            None => Slice::ALL.to_vec(),
        };

        let config = Self {
            backend,
            location,
            persist,
        };
        config.validate()?;
        info!(backend = ?config.backend, location = %config.location, "Storage configuration loaded from environment");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(anyhow::anyhow!("Storage location cannot be empty"));
        }

        if self.backend == StorageBackend::Sqlite && !self.location.starts_with("sqlite:") {
            return Err(anyhow::anyhow!(
                "SQLite storage expects a sqlite: URL, got '{}'",
                self.location
            ));
        }

        if self.persist.is_empty() {
            warn!("No slices are persisted; state will reset on every start");
        }

        Ok(())
    }
}

/// Default storage location under the platform data directory
pub fn default_location(backend: StorageBackend) -> String {
    let base = dirs::data_dir()
        .map(|p| p.join("wellness-tracker"))
        .unwrap_or_else(|| PathBuf::from("./data"));

    match backend {
        StorageBackend::Json => base.join("state.json").to_string_lossy().to_string(),
        StorageBackend::Sqlite => format!("sqlite:{}", base.join("state.db").to_string_lossy()),
    }
}

/// Parse a comma-separated slice list
fn parse_slices(raw: &str) -> Result<Vec<Slice>> {
    let mut slices = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let slice: Slice = name.parse()?;
        if !slices.contains(&slice) {
            slices.push(slice);
        }
    }
    Ok(slices)
}

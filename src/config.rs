// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the wellness tracker

pub mod environment;
pub mod tracking_config;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use environment::{StorageBackend, StorageConfig};
pub use tracking_config::{HistoryLimits, QuickLogIncrements, TrackingConfig};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
}

fn default_config_path() -> String {
    dirs::config_dir()
        .map(|p| p.join("wellness-tracker/config.toml"))
        .unwrap_or_else(|| "config.toml".into())
        .to_string_lossy()
        .to_string()
}

impl Config {
    /// Load from `path`, the default config file, or the environment, in that order
    pub fn load(path: Option<String>) -> Result<Self> {
        let config_path = path.unwrap_or_else(default_config_path);

        let config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str::<Config>(&content).context("Failed to parse config file")?
        } else {
            Config {
                storage: StorageConfig::from_env()?,
                tracking: TrackingConfig::default(),
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.tracking.validate()
    }

    pub fn save(&self, path: Option<String>) -> Result<()> {
        let config_path = path.unwrap_or_else(default_config_path);

        let parent = Path::new(&config_path)
            .parent()
            .context("Invalid config path")?;
        fs::create_dir_all(parent)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }

    /// Human-readable summary for startup logs
    pub fn summary(&self) -> String {
        let persisted: Vec<&str> = self.storage.persist.iter().map(|s| s.as_str()).collect();
        format!(
            "Wellness Tracker Configuration:\n\
             - Storage: {:?} at {}\n\
             - Persisted slices: {}\n\
             - Progress history: {} days\n\
             - Risk history: {} days\n\
             - Plan band: {}..{}",
            self.storage.backend,
            self.storage.location,
            if persisted.is_empty() { "none".to_string() } else { persisted.join(", ") },
            self.tracking.history.progress_days,
            self.tracking.history.risk_days,
            self.tracking.plan_band.lower,
            self.tracking.plan_band.upper,
        )
    }
}

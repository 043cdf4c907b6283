// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Domain constants for the risk engine and progress tracking, plus
//! environment-based configuration values.

/// Service identity used in logs and the persisted tree
pub mod service {
    pub const SERVICE_NAME: &str = "wellness-tracker";
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Version of the persisted state layout
    pub const SCHEMA_VERSION: u32 = 1;
}

/// Risk engine constants. These are fixed domain values, not tunables.
pub mod risk {
    /// Age used when the profile age is missing or not numeric
    pub const DEFAULT_AGE: f64 = 35.0;

    /// Compliance used when there are no goals
    pub const DEFAULT_COMPLIANCE_SCORE: f64 = 50.0;

    pub const CRITICAL_THRESHOLD: f64 = 70.0;
    pub const HIGH_THRESHOLD: f64 = 50.0;
    pub const MODERATE_THRESHOLD: f64 = 30.0;

    /// Number of entries in an assessment's top risk list
    pub const TOP_RISK_COUNT: usize = 3;
}

/// Defaults for progress and risk history handling
pub mod progress {
    pub const PROGRESS_HISTORY_LIMIT: usize = 90;
    pub const RISK_HISTORY_LIMIT: usize = 30;

    /// Completion ratio band counted as on track
    pub const ON_TRACK_LOWER: f64 = 0.8;
    pub const ON_TRACK_UPPER: f64 = 1.2;

    pub const WEEKLY_TARGET_MULTIPLIER: f64 = 7.0;
    pub const MONTHLY_TARGET_MULTIPLIER: f64 = 30.0;
}

/// Default goal catalog values
pub mod goals {
    /// `current` may not exceed this multiple of `target` when incrementing
    pub const INCREMENT_CEILING: f64 = 1.5;

    pub const STEPS_GOAL_ID: &str = "1";
    pub const STEPS_GOAL_TITLE: &str = "Daily Steps";
    pub const ACTIVE_MINUTES_GOAL_TITLE: &str = "Active Minutes";

    pub const QUICK_STEPS_INCREMENT: f64 = 500.0;
    pub const QUICK_FITNESS_INCREMENT: f64 = 15.0;
    pub const QUICK_DEFAULT_INCREMENT: f64 = 1.0;
    pub const WORKOUT_MINUTES: f64 = 30.0;
    pub const WALK_STEPS: f64 = 1000.0;
}

/// Onboarding wizard constants
pub mod onboarding {
    /// Index of the last wizard step (confirmation)
    pub const LAST_STEP: u8 = 2;

    /// Ages must be strictly between 0 and this value
    pub const MAX_AGE: f64 = 150.0;
}

/// Environment-based configuration
pub mod env_config {
    use std::env;

    /// Storage backend name (`json` or `sqlite`)
    pub fn storage_backend() -> String {
        env::var("WELLNESS_STORAGE_BACKEND").unwrap_or_else(|_| "json".to_string())
    }

    /// Storage location: a file path for `json`, a database URL for `sqlite`
    pub fn storage_path() -> Option<String> {
        env::var("WELLNESS_STORAGE_PATH").ok()
    }

    /// Comma-separated list of persisted slices
    pub fn persist_slices() -> Option<String> {
        env::var("WELLNESS_PERSIST_SLICES").ok()
    }
}

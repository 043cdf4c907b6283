// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tracking parameters for history retention, plan adherence and quick logging

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::constants::goals::{
    INCREMENT_CEILING, QUICK_DEFAULT_INCREMENT, QUICK_FITNESS_INCREMENT, QUICK_STEPS_INCREMENT,
    WALK_STEPS, WORKOUT_MINUTES,
};
use crate::constants::progress::{PROGRESS_HISTORY_LIMIT, RISK_HISTORY_LIMIT};
use crate::intelligence::PlanBand;

/// Main tracking configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub history: HistoryLimits,
    pub plan_band: PlanBand,
    /// Multiple of the target that increments may not exceed
    pub increment_ceiling: f64,
    pub quick_log: QuickLogIncrements,
}

/// Rolling history sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryLimits {
    pub progress_days: usize,
    pub risk_days: usize,
}

/// Amounts added by the one-tap logging actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickLogIncrements {
    /// Steps goal
    pub steps: f64,
    /// Any other fitness goal (active minutes)
    pub fitness: f64,
    pub wellness: f64,
    pub nutrition: f64,
    pub sleep: f64,
    pub workout_minutes: f64,
    pub walk_steps: f64,
}

impl TrackingConfig {
    /// Load tracking configuration from a TOML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tracking config file: {}", path))?;

        let config: TrackingConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse tracking config file: {}", path))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.history.progress_days == 0 || self.history.risk_days == 0 {
            return Err(anyhow::anyhow!("History limits must be greater than zero"));
        }

        if !(self.plan_band.lower > 0.0 && self.plan_band.lower <= self.plan_band.upper) {
            return Err(anyhow::anyhow!(
                "Invalid plan band: lower={} upper={}",
                self.plan_band.lower,
                self.plan_band.upper
            ));
        }

        if self.increment_ceiling < 1.0 {
            return Err(anyhow::anyhow!(
                "Increment ceiling must be at least 1.0, got {}",
                self.increment_ceiling
            ));
        }

        Ok(())
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            history: HistoryLimits::default(),
            plan_band: PlanBand::default(),
            increment_ceiling: INCREMENT_CEILING,
            quick_log: QuickLogIncrements::default(),
        }
    }
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            progress_days: PROGRESS_HISTORY_LIMIT,
            risk_days: RISK_HISTORY_LIMIT,
        }
    }
}

impl Default for QuickLogIncrements {
    fn default() -> Self {
        Self {
            steps: QUICK_STEPS_INCREMENT,
            fitness: QUICK_FITNESS_INCREMENT,
            wellness: QUICK_DEFAULT_INCREMENT,
            nutrition: QUICK_DEFAULT_INCREMENT,
            sleep: QUICK_DEFAULT_INCREMENT,
            workout_minutes: WORKOUT_MINUTES,
            walk_steps: WALK_STEPS,
        }
    }
}

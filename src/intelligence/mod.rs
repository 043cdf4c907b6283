// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Intelligence Module
//!
//! Deterministic analytics over snapshot state. Nothing in here mutates the
//! application state or touches storage; callers pass the current profile,
//! goals and history and get fresh values back.
//!
//! This module includes:
//! - Health risk estimation and assessment
//! - Progress statistics and streak calculation
//! - The default wellness goal catalog and quick-log rules

pub mod goal_catalog;
pub mod progress_analyzer;
pub mod risk_engine;

pub use goal_catalog::{default_goals, ActivityShortcut};
pub use progress_analyzer::{compute_progress_stats, PlanBand, ProgressAggregator};
pub use risk_engine::{calculate_risk_assessment, compliance_score, generate_health_risks, RiskKind};

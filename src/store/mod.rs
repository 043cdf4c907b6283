// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Application State
//!
//! The whole application state lives in one [`AppState`] tree with four
//! slices. [`Store`] owns the tree and is the only writer: every change goes
//! through [`Store::dispatch`] with an [`Action`], which routes it to the
//! reducer of the matching slice.
//!
//! Behaviour that spans slices (initializing goals once an activity level is
//! known, recording today's progress, recalculating risks) is exposed as
//! explicit `Store` methods so callers decide when it runs.

pub mod dashboard;
pub mod onboarding;
pub mod progress;
pub mod risk;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

pub use dashboard::{DashboardAction, DashboardState};
pub use onboarding::{root_screens, OnboardingAction, OnboardingState, OnboardingStep, Screen};
pub use progress::{GoalTargets, HistoryUpsert, ProgressAction, ProgressState};
pub use risk::{RiskAction, RiskState};

use crate::config::TrackingConfig;
use crate::constants::service::SCHEMA_VERSION;
use crate::intelligence::goal_catalog::{parse_custom_progress, quick_increment};
use crate::intelligence::{ActivityShortcut, ProgressAggregator};
use crate::logging::AppLogger;
use crate::models::{
    ProgressHistoryEntry, ProgressStats, UnknownVariant, UserProfile, WellnessGoal,
};
use crate::validation::{validate_profile, ValidationReport};

/// Top-level keys of the state tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slice {
    Onboarding,
    Dashboard,
    Progress,
    Risk,
}

impl Slice {
    pub const ALL: [Slice; 4] = [Slice::Onboarding, Slice::Dashboard, Slice::Progress, Slice::Risk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slice::Onboarding => "onboarding",
            Slice::Dashboard => "dashboard",
            Slice::Progress => "progress",
            Slice::Risk => "risk",
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slice {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "onboarding" => Ok(Slice::Onboarding),
            "dashboard" => Ok(Slice::Dashboard),
            "progress" => Ok(Slice::Progress),
            "risk" => Ok(Slice::Risk),
            other => Err(UnknownVariant {
                kind: "slice",
                value: other.to_string(),
                expected: "onboarding, dashboard, progress, risk".to_string(),
            }),
        }
    }
}

/// Root of the persisted state tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Missing in trees written before versioning; read as 0
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub onboarding: OnboardingState,
    #[serde(default)]
    pub dashboard: DashboardState,
    #[serde(default)]
    pub progress: ProgressState,
    #[serde(default)]
    pub risk: RiskState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            onboarding: OnboardingState::default(),
            dashboard: DashboardState::default(),
            progress: ProgressState::default(),
            risk: RiskState::default(),
        }
    }
}

/// An action routed to one slice reducer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "slice", content = "action", rename_all = "snake_case")]
pub enum Action {
    Onboarding(OnboardingAction),
    Dashboard(DashboardAction),
    Progress(ProgressAction),
    Risk(RiskAction),
}

impl Action {
    pub fn slice(&self) -> Slice {
        match self {
            Action::Onboarding(_) => Slice::Onboarding,
            Action::Dashboard(_) => Slice::Dashboard,
            Action::Progress(_) => Slice::Progress,
            Action::Risk(_) => Slice::Risk,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Onboarding(action) => action.name(),
            Action::Dashboard(action) => action.name(),
            Action::Progress(action) => action.name(),
            Action::Risk(action) => action.name(),
        }
    }
}

impl From<OnboardingAction> for Action {
    fn from(action: OnboardingAction) -> Self {
        Action::Onboarding(action)
    }
}

impl From<DashboardAction> for Action {
    fn from(action: DashboardAction) -> Self {
        Action::Dashboard(action)
    }
}

impl From<ProgressAction> for Action {
    fn from(action: ProgressAction) -> Self {
        Action::Progress(action)
    }
}

impl From<RiskAction> for Action {
    fn from(action: RiskAction) -> Self {
        Action::Risk(action)
    }
}

/// Rejected goal logging input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalInputError {
    #[error("No goal with id '{0}'")]
    UnknownGoal(String),
    #[error("No '{0}' goal to log the activity against")]
    MissingShortcutGoal(String),
    #[error("Invalid progress value '{0}': expected a non-negative number")]
    InvalidValue(String),
}

/// Single-writer owner of the application state
#[derive(Debug, Clone)]
pub struct Store {
    state: AppState,
    config: TrackingConfig,
}

impl Store {
    pub fn new(config: TrackingConfig) -> Self {
        Self::from_state(AppState::default(), config)
    }

    pub fn from_state(state: AppState, config: TrackingConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    pub fn dispatch(&mut self, action: impl Into<Action>) -> Option<HistoryUpsert> {
        self.dispatch_at(action, Utc::now())
    }

    /// Apply an action as of `now`. Returns the history outcome for actions
    /// that write progress or risk history.
    pub fn dispatch_at(&mut self, action: impl Into<Action>, now: DateTime<Utc>) -> Option<HistoryUpsert> {
        let action = action.into();
        AppLogger::log_action(action.slice().as_str(), action.name());

        match action {
            Action::Onboarding(action) => {
                self.state.onboarding.reduce(action);
                None
            }
            Action::Dashboard(action) => {
                self.state
                    .dashboard
                    .reduce(action, now, self.config.increment_ceiling);
                None
            }
            Action::Progress(action) => {
                let recorded = match &action {
                    ProgressAction::RecordDailyProgress(entry) => {
                        Some((entry.date, entry.completed_goals, entry.total_goals))
                    }
                    _ => None,
                };
                let outcome = self.state.progress.reduce(
                    action,
                    now.date_naive(),
                    self.config.history.progress_days,
                );
                if let (Some((date, completed, total)), Some(outcome)) = (recorded, outcome) {
                    AppLogger::log_progress_recorded(&date.to_string(), completed, total, outcome);
                }
                outcome
            }
            Action::Risk(action) => {
                let outcome = self
                    .state
                    .risk
                    .reduce(action, now, self.config.history.risk_days);
                if outcome.is_some() {
                    AppLogger::log_risk_assessment(
                        &self.state.risk.risk_assessment,
                        self.state.risk.current_risks.len(),
                    );
                }
                outcome
            }
        }
    }

    /// Validate a completed user-info form, store it and advance the wizard
    pub fn submit_profile(&mut self, profile: UserProfile) -> Result<(), ValidationReport> {
        if let Err(report) = validate_profile(&profile) {
            for (field, error) in &report.errors {
                AppLogger::log_validation_failure(&format!("{:?}", field), &error.to_string());
            }
            return Err(report);
        }

        self.dispatch(OnboardingAction::UpdateProfile(profile.into()));
        self.dispatch(OnboardingAction::NextStep);
        Ok(())
    }

    /// Load the default goals once the activity level is known and no goals exist
    pub fn ensure_goals(&mut self, now: DateTime<Utc>) -> bool {
        let Some(level) = self.state.onboarding.user_profile.activity_level else {
            return false;
        };
        if !self.state.dashboard.wellness_goals.is_empty() {
            return false;
        }

        info!(activity_level = %level, "Initializing default goals");
        self.dispatch_at(DashboardAction::InitializeGoals(level), now);
        true
    }

    /// Seed period targets and record today's snapshot of the goals
    pub fn sync_progress(&mut self, now: DateTime<Utc>) -> Option<HistoryUpsert> {
        let goals = &self.state.dashboard.wellness_goals;
        if goals.is_empty() {
            debug!("No goals yet, skipping progress sync");
            return None;
        }

        let daily: GoalTargets = goals.iter().map(|g| (g.id.clone(), g.target)).collect();
        let entry = ProgressHistoryEntry::from_goals(now.date_naive(), goals);

        self.dispatch_at(ProgressAction::InitializeWeeklyTargets(daily.clone()), now);
        self.dispatch_at(ProgressAction::InitializeMonthlyTargets(daily), now);
        self.dispatch_at(ProgressAction::RecordDailyProgress(entry), now)
    }

    /// Recalculate risks from the current profile and goals
    pub fn refresh_risks(&mut self, now: DateTime<Utc>) -> Option<HistoryUpsert> {
        if self.state.dashboard.wellness_goals.is_empty() {
            debug!("No goals yet, skipping risk calculation");
            return None;
        }

        let action = RiskAction::CalculateRisks {
            profile: self.state.onboarding.user_profile.clone(),
            goals: self.state.dashboard.wellness_goals.clone(),
        };
        self.dispatch_at(action, now)
    }

    /// Goal-derived follow-ups after any goal or profile change
    pub fn sync(&mut self, now: DateTime<Utc>) {
        self.ensure_goals(now);
        self.sync_progress(now);
        self.refresh_risks(now);
    }

    /// Add the category's quick increment to a goal; returns the new value
    pub fn quick_add(&mut self, goal_id: &str, now: DateTime<Utc>) -> Result<f64, GoalInputError> {
        let goal = self
            .state
            .dashboard
            .goal(goal_id)
            .ok_or_else(|| GoalInputError::UnknownGoal(goal_id.to_string()))?;
        let increment = quick_increment(goal, &self.config.quick_log);

        self.increment(goal_id, increment, now)
    }

    /// Log a workout or walk against its goal; returns the new value
    pub fn log_activity(&mut self, shortcut: ActivityShortcut, now: DateTime<Utc>) -> Result<f64, GoalInputError> {
        let goal_id = shortcut
            .find_goal(&self.state.dashboard.wellness_goals)
            .map(|g| g.id.clone())
            .ok_or_else(|| GoalInputError::MissingShortcutGoal(shortcut.goal_title().to_string()))?;
        let increment = shortcut.increment(&self.config.quick_log);

        self.increment(&goal_id, increment, now)
    }

    /// Set a goal from user-entered text
    pub fn set_custom_progress(&mut self, goal_id: &str, text: &str, now: DateTime<Utc>) -> Result<f64, GoalInputError> {
        if self.state.dashboard.goal(goal_id).is_none() {
            return Err(GoalInputError::UnknownGoal(goal_id.to_string()));
        }
        let current = parse_custom_progress(text).ok_or_else(|| GoalInputError::InvalidValue(text.to_string()))?;

        self.dispatch_at(
            DashboardAction::UpdateGoalProgress {
                goal_id: goal_id.to_string(),
                current,
            },
            now,
        );
        Ok(current)
    }

    fn increment(&mut self, goal_id: &str, increment: f64, now: DateTime<Utc>) -> Result<f64, GoalInputError> {
        self.dispatch_at(
            DashboardAction::IncrementGoalProgress {
                goal_id: goal_id.to_string(),
                increment,
            },
            now,
        );
        self.state
            .dashboard
            .goal(goal_id)
            .map(|g| g.current)
            .ok_or_else(|| GoalInputError::UnknownGoal(goal_id.to_string()))
    }

    pub fn progress_stats(&self, today: NaiveDate) -> ProgressStats {
        ProgressAggregator::new(self.config.plan_band).compute(
            &self.state.dashboard.wellness_goals,
            &self.state.progress.progress_history,
            self.state.progress.current_streak,
            today,
        )
    }

    /// Goals in the progress screen's selected category, or all goals
    pub fn filtered_goals(&self) -> Vec<&WellnessGoal> {
        let category = self.state.progress.selected_category;
        self.state
            .dashboard
            .wellness_goals
            .iter()
            .filter(|goal| category.map_or(true, |c| goal.category == c))
            .collect()
    }

    pub fn root_screens(&self) -> &'static [Screen] {
        root_screens(&self.state.onboarding)
    }
}

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Default wellness goals and quick-logging rules

use crate::config::QuickLogIncrements;
use crate::constants::goals::{ACTIVE_MINUTES_GOAL_TITLE, STEPS_GOAL_ID, STEPS_GOAL_TITLE};
use crate::models::{ActivityLevel, GoalCategory, WellnessGoal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Daily step target for an activity level
pub fn steps_target(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 5000.0,
        ActivityLevel::LightlyActive => 7500.0,
        ActivityLevel::ModeratelyActive => 10000.0,
        ActivityLevel::VeryActive | ActivityLevel::ExtremelyActive => 12000.0,
    }
}

/// Daily active-minutes target for an activity level
pub fn active_minutes_target(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 15.0,
        ActivityLevel::LightlyActive => 30.0,
        ActivityLevel::ModeratelyActive => 45.0,
        ActivityLevel::VeryActive | ActivityLevel::ExtremelyActive => 60.0,
    }
}

/// The five starter goals, all at zero progress
pub fn default_goals(level: ActivityLevel, now: DateTime<Utc>) -> Vec<WellnessGoal> {
    let goal = |id: &str, title: &str, icon: &str, target: f64, unit: &str, color: &str, category| {
        WellnessGoal {
            id: id.to_string(),
            title: title.to_string(),
            icon: icon.to_string(),
            current: 0.0,
            target,
            unit: unit.to_string(),
            color: color.to_string(),
            category,
            created_at: now,
            updated_at: now,
        }
    };

    vec![
        goal(STEPS_GOAL_ID, STEPS_GOAL_TITLE, "👟", steps_target(level), "steps", "#FF6B6B", GoalCategory::Fitness),
        goal("2", "Water Intake", "💧", 8.0, "glasses", "#4ECDC4", GoalCategory::Wellness),
        goal("3", "Sleep Hours", "😴", 8.0, "hours", "#9B59B6", GoalCategory::Sleep),
        goal("4", ACTIVE_MINUTES_GOAL_TITLE, "🏃‍♂️", active_minutes_target(level), "minutes", "#F39C12", GoalCategory::Fitness),
        goal("5", "Fruits & Vegetables", "🥗", 5.0, "servings", "#27AE60", GoalCategory::Nutrition),
    ]
}

/// Amount added by a single "add progress" tap on a goal
pub fn quick_increment(goal: &WellnessGoal, increments: &QuickLogIncrements) -> f64 {
    match goal.category {
        GoalCategory::Fitness if goal.id == STEPS_GOAL_ID => increments.steps,
        GoalCategory::Fitness => increments.fitness,
        GoalCategory::Wellness => increments.wellness,
        GoalCategory::Nutrition => increments.nutrition,
        GoalCategory::Sleep => increments.sleep,
    }
}

/// Parse a manually entered progress value; negatives and garbage are rejected
pub fn parse_custom_progress(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let value = if trimmed.is_empty() {
        0.0
    } else {
        trimmed.parse::<f64>().ok()?
    };

    (value.is_finite() && value >= 0.0).then_some(value)
}

/// One-tap activity logging shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityShortcut {
    Workout,
    Walk,
}

impl ActivityShortcut {
    /// Title of the goal this shortcut feeds
    pub fn goal_title(&self) -> &'static str {
        match self {
            ActivityShortcut::Workout => ACTIVE_MINUTES_GOAL_TITLE,
            ActivityShortcut::Walk => STEPS_GOAL_TITLE,
        }
    }

    pub fn increment(&self, increments: &QuickLogIncrements) -> f64 {
        match self {
            ActivityShortcut::Workout => increments.workout_minutes,
            ActivityShortcut::Walk => increments.walk_steps,
        }
    }

    /// Find the goal this shortcut applies to
    pub fn find_goal<'a>(&self, goals: &'a [WellnessGoal]) -> Option<&'a WellnessGoal> {
        goals.iter().find(|g| g.title == self.goal_title())
    }
}

impl fmt::Display for ActivityShortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityShortcut::Workout => f.write_str("workout"),
            ActivityShortcut::Walk => f.write_str("walk"),
        }
    }
}

impl FromStr for ActivityShortcut {
    type Err = crate::models::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "workout" => Ok(ActivityShortcut::Workout),
            "walk" => Ok(ActivityShortcut::Walk),
            other => Err(crate::models::UnknownVariant {
                kind: "activity",
                value: other.to_string(),
                expected: "workout, walk".to_string(),
            }),
        }
    }
}

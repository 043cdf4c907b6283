// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Dashboard state: daily goals and counters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::intelligence::default_goals;
use crate::models::{
    ActivityLevel, DailyStats, DailyStatsUpdate, NewGoal, Streaks, StreaksUpdate, WellnessGoal,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardState {
    pub wellness_goals: Vec<WellnessGoal>,
    pub daily_stats: DailyStats,
    pub streaks: Streaks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DashboardAction {
    /// Replace the goal list with the defaults for an activity level
    InitializeGoals(ActivityLevel),
    UpdateGoalProgress { goal_id: String, current: f64 },
    /// Add to a goal, capped at the increment ceiling times its target
    IncrementGoalProgress { goal_id: String, increment: f64 },
    AddCustomGoal(NewGoal),
    RemoveGoal(String),
    UpdateDailyStats(DailyStatsUpdate),
    UpdateStreaks(StreaksUpdate),
    /// Zero every goal and the daily counters
    ResetDailyProgress,
}

impl DashboardAction {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardAction::InitializeGoals(_) => "initialize_goals",
            DashboardAction::UpdateGoalProgress { .. } => "update_goal_progress",
            DashboardAction::IncrementGoalProgress { .. } => "increment_goal_progress",
            DashboardAction::AddCustomGoal(_) => "add_custom_goal",
            DashboardAction::RemoveGoal(_) => "remove_goal",
            DashboardAction::UpdateDailyStats(_) => "update_daily_stats",
            DashboardAction::UpdateStreaks(_) => "update_streaks",
            DashboardAction::ResetDailyProgress => "reset_daily_progress",
        }
    }
}

impl DashboardState {
    pub fn goal(&self, goal_id: &str) -> Option<&WellnessGoal> {
        self.wellness_goals.iter().find(|g| g.id == goal_id)
    }

    fn goal_mut(&mut self, goal_id: &str) -> Option<&mut WellnessGoal> {
        self.wellness_goals.iter_mut().find(|g| g.id == goal_id)
    }

    /// Apply an action. Unknown goal ids are ignored.
    pub fn reduce(&mut self, action: DashboardAction, now: DateTime<Utc>, increment_ceiling: f64) {
        match action {
            DashboardAction::InitializeGoals(level) => {
                self.wellness_goals = default_goals(level, now);
            }
            DashboardAction::UpdateGoalProgress { goal_id, current } => {
                if let Some(goal) = self.goal_mut(&goal_id) {
                    goal.current = current;
                    goal.updated_at = now;
                } else {
                    debug!(goal_id = %goal_id, "Ignoring progress update for unknown goal");
                }
            }
            DashboardAction::IncrementGoalProgress { goal_id, increment } => {
                if let Some(goal) = self.goal_mut(&goal_id) {
                    goal.current = (goal.current + increment).min(goal.target * increment_ceiling);
                    goal.updated_at = now;
                } else {
                    debug!(goal_id = %goal_id, "Ignoring increment for unknown goal");
                }
            }
            DashboardAction::AddCustomGoal(new_goal) => {
                self.wellness_goals.push(WellnessGoal {
                    id: Uuid::new_v4().to_string(),
                    title: new_goal.title,
                    icon: new_goal.icon,
                    current: new_goal.current,
                    target: new_goal.target,
                    unit: new_goal.unit,
                    color: new_goal.color,
                    category: new_goal.category,
                    created_at: now,
                    updated_at: now,
                });
            }
            DashboardAction::RemoveGoal(goal_id) => {
                self.wellness_goals.retain(|g| g.id != goal_id);
            }
            DashboardAction::UpdateDailyStats(update) => self.daily_stats.apply(update),
            DashboardAction::UpdateStreaks(update) => self.streaks.apply(update),
            DashboardAction::ResetDailyProgress => {
                for goal in &mut self.wellness_goals {
                    goal.current = 0.0;
                    goal.updated_at = now;
                }
                self.daily_stats = DailyStats::default();
            }
        }
    }
}

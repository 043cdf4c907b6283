// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Progress history, period targets and streaks

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::progress::{MONTHLY_TARGET_MULTIPLIER, WEEKLY_TARGET_MULTIPLIER};
use crate::intelligence::progress_analyzer::current_streak;
use crate::models::{GoalCategory, ProgressHistoryEntry, TimeRange};

/// Goal id to target value
pub type GoalTargets = BTreeMap<String, f64>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressState {
    /// One entry per date, oldest first
    pub progress_history: Vec<ProgressHistoryEntry>,
    pub weekly_targets: GoalTargets,
    pub monthly_targets: GoalTargets,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub selected_time_range: TimeRange,
    pub selected_category: Option<GoalCategory>,
}

/// Outcome of recording a day's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryUpsert {
    /// New date appended; `evicted` oldest entries were dropped to stay under the cap
    Inserted { evicted: usize },
    /// Existing entry for that date replaced
    Updated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ProgressAction {
    RecordDailyProgress(ProgressHistoryEntry),
    SetWeeklyTargets(GoalTargets),
    SetMonthlyTargets(GoalTargets),
    /// Set from daily targets, only while no weekly targets exist
    InitializeWeeklyTargets(GoalTargets),
    /// Set from daily targets, only while no monthly targets exist
    InitializeMonthlyTargets(GoalTargets),
    UpdateStreak(u32),
    SetTimeRange(TimeRange),
    SetCategoryFilter(Option<GoalCategory>),
    ResetProgress,
}

impl ProgressAction {
    pub fn name(&self) -> &'static str {
        match self {
            ProgressAction::RecordDailyProgress(_) => "record_daily_progress",
            ProgressAction::SetWeeklyTargets(_) => "set_weekly_targets",
            ProgressAction::SetMonthlyTargets(_) => "set_monthly_targets",
            ProgressAction::InitializeWeeklyTargets(_) => "initialize_weekly_targets",
            ProgressAction::InitializeMonthlyTargets(_) => "initialize_monthly_targets",
            ProgressAction::UpdateStreak(_) => "update_streak",
            ProgressAction::SetTimeRange(_) => "set_time_range",
            ProgressAction::SetCategoryFilter(_) => "set_category_filter",
            ProgressAction::ResetProgress => "reset_progress",
        }
    }
}

fn scale_targets(daily: &GoalTargets, factor: f64) -> GoalTargets {
    daily
        .iter()
        .map(|(id, target)| (id.clone(), target * factor))
        .collect()
}

impl ProgressState {
    /// Upsert `entry` by date and refresh the streak when today is complete.
    ///
    /// Inserting past `limit` drops the oldest entries by position. The
    /// current streak only changes when the entry for `today` has every goal
    /// met; otherwise it keeps its previous value.
    pub fn record_daily_progress(
        &mut self,
        entry: ProgressHistoryEntry,
        today: NaiveDate,
        limit: usize,
    ) -> HistoryUpsert {
        let outcome = match self
            .progress_history
            .iter_mut()
            .find(|existing| existing.date == entry.date)
        {
            Some(existing) => {
                *existing = entry;
                HistoryUpsert::Updated
            }
            None => {
                self.progress_history.push(entry);
                let evicted = self.progress_history.len().saturating_sub(limit);
                self.progress_history.drain(..evicted);
                HistoryUpsert::Inserted { evicted }
            }
        };

        let today_complete = self
            .progress_history
            .iter()
            .find(|e| e.date == today)
            .is_some_and(ProgressHistoryEntry::is_complete);

        if today_complete {
            self.set_streak(current_streak(&self.progress_history));
        }

        outcome
    }

    fn set_streak(&mut self, streak: u32) {
        self.current_streak = streak;
        self.longest_streak = self.longest_streak.max(streak);
    }

    /// Apply an action, returning the history outcome for recorded progress
    pub fn reduce(&mut self, action: ProgressAction, today: NaiveDate, limit: usize) -> Option<HistoryUpsert> {
        match action {
            ProgressAction::RecordDailyProgress(entry) => {
                return Some(self.record_daily_progress(entry, today, limit));
            }
            ProgressAction::SetWeeklyTargets(targets) => self.weekly_targets = targets,
            ProgressAction::SetMonthlyTargets(targets) => self.monthly_targets = targets,
            ProgressAction::InitializeWeeklyTargets(daily) => {
                if self.weekly_targets.is_empty() {
                    self.weekly_targets = scale_targets(&daily, WEEKLY_TARGET_MULTIPLIER);
                }
            }
            ProgressAction::InitializeMonthlyTargets(daily) => {
                if self.monthly_targets.is_empty() {
                    self.monthly_targets = scale_targets(&daily, MONTHLY_TARGET_MULTIPLIER);
                }
            }
            ProgressAction::UpdateStreak(streak) => self.set_streak(streak),
            ProgressAction::SetTimeRange(range) => self.selected_time_range = range,
            ProgressAction::SetCategoryFilter(category) => self.selected_category = category,
            ProgressAction::ResetProgress => *self = Self::default(),
        }
        None
    }
}

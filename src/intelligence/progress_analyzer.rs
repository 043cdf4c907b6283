// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Goal completion statistics over today, the current week and month

use crate::constants::progress::{ON_TRACK_LOWER, ON_TRACK_UPPER};
use crate::models::{
    DayStats, MonthStats, PlanStats, ProgressHistoryEntry, ProgressStats, WeekStats, WellnessGoal,
};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Completion ratio band regarded as following the plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanBand {
    pub lower: f64,
    pub upper: f64,
}

impl Default for PlanBand {
    fn default() -> Self {
        Self {
            lower: ON_TRACK_LOWER,
            upper: ON_TRACK_UPPER,
        }
    }
}

/// Where a single goal stands against its daily target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStatus {
    Behind,
    OnTrack,
    Ahead,
}

impl PlanBand {
    pub fn classify(&self, ratio: f64) -> PlanStatus {
        if ratio >= self.lower && ratio <= self.upper {
            PlanStatus::OnTrack
        } else if ratio < self.lower {
            PlanStatus::Behind
        } else {
            PlanStatus::Ahead
        }
    }
}

/// Most recent Sunday on or before `today`
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
}

pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

fn percentage(completed: usize, total: usize) -> f64 {
    if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Sum completed/total over history entries dated within `[start, end]`
fn window_totals(history: &[ProgressHistoryEntry], start: NaiveDate, end: NaiveDate) -> (usize, usize) {
    history
        .iter()
        .filter(|entry| entry.date >= start && entry.date <= end)
        .fold((0, 0), |(completed, total), entry| {
            (completed + entry.completed_goals, total + entry.total_goals)
        })
}

/// Length of the run of complete days, newest first, up to the first
/// incomplete entry. Calendar gaps are not breaks.
pub fn current_streak(history: &[ProgressHistoryEntry]) -> u32 {
    let mut sorted: Vec<&ProgressHistoryEntry> = history.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    sorted
        .into_iter()
        .take_while(|entry| entry.is_complete())
        .count() as u32
}

/// Computes [`ProgressStats`] from goal and history snapshots
#[derive(Debug, Clone, Default)]
pub struct ProgressAggregator {
    band: PlanBand,
}

impl ProgressAggregator {
    pub fn new(band: PlanBand) -> Self {
        Self { band }
    }

    pub fn compute(
        &self,
        goals: &[WellnessGoal],
        history: &[ProgressHistoryEntry],
        current_streak: u32,
        today: NaiveDate,
    ) -> ProgressStats {
        let today_completed = goals.iter().filter(|g| g.is_completed()).count();
        let today_total = goals.len();

        let (week_completed, week_total) = window_totals(history, week_start(today), today);
        let week_percentage = percentage(week_completed, week_total);

        let (month_completed, month_total) = window_totals(history, month_start(today), today);

        let mut against_plan = PlanStats {
            total_goals: goals.len(),
            ..PlanStats::default()
        };
        for goal in goals {
            match self.band.classify(goal.completion_ratio()) {
                PlanStatus::OnTrack => against_plan.on_track += 1,
                PlanStatus::Behind => against_plan.behind += 1,
                PlanStatus::Ahead => against_plan.ahead += 1,
            }
        }

        ProgressStats {
            today: DayStats {
                completed: today_completed,
                total: today_total,
                percentage: percentage(today_completed, today_total),
            },
            week: WeekStats {
                completed: week_completed,
                total: week_total,
                percentage: week_percentage,
                streak: current_streak,
            },
            month: MonthStats {
                completed: month_completed,
                total: month_total,
                percentage: percentage(month_completed, month_total),
                // the current week, not the best week of the month
                best_week: week_percentage.max(0.0),
            },
            against_plan,
        }
    }
}

/// [`ProgressAggregator::compute`] with the default plan band
pub fn compute_progress_stats(
    goals: &[WellnessGoal],
    history: &[ProgressHistoryEntry],
    current_streak: u32,
    today: NaiveDate,
) -> ProgressStats {
    ProgressAggregator::default().compute(goals, history, current_streak, today)
}

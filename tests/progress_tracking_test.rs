// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Multi-day progress tracking through the store

use chrono::{DateTime, Duration, TimeZone, Utc};
use wellness_tracker::config::TrackingConfig;
use wellness_tracker::intelligence::compute_progress_stats;
use wellness_tracker::models::{ActivityLevel, UserProfile};
use wellness_tracker::store::{
    DashboardAction, HistoryUpsert, OnboardingAction, ProgressAction, Store,
};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, 20, 0, 0).unwrap()
}

fn store_with_goals(start: DateTime<Utc>) -> Store {
    let mut store = Store::new(TrackingConfig::default());
    store.dispatch_at(
        OnboardingAction::UpdateProfile(
            UserProfile {
                activity_level: Some(ActivityLevel::ModeratelyActive),
                ..UserProfile::default()
            }
            .into(),
        ),
        start,
    );
    assert!(store.ensure_goals(start));
    store
}

fn complete_all_goals(store: &mut Store, now: DateTime<Utc>) {
    let targets: Vec<(String, f64)> = store
        .state()
        .dashboard
        .wellness_goals
        .iter()
        .map(|g| (g.id.clone(), g.target))
        .collect();

    for (goal_id, target) in targets {
        store.dispatch_at(DashboardAction::UpdateGoalProgress { goal_id, current: target }, now);
    }
}

#[test]
fn test_streak_builds_over_consecutive_days() {
    // Sunday 2024-03-10 through Wednesday 2024-03-13
    let mut store = store_with_goals(day(10));

    for (offset, d) in (10..=13).enumerate() {
        let now = day(d);
        store.dispatch_at(DashboardAction::ResetDailyProgress, now);
        complete_all_goals(&mut store, now);

        assert_eq!(store.sync_progress(now), Some(HistoryUpsert::Inserted { evicted: 0 }));
        assert_eq!(store.state().progress.current_streak, offset as u32 + 1);
    }

    assert_eq!(store.state().progress.longest_streak, 4);

    let stats = store.progress_stats(day(13).date_naive());
    assert_eq!(stats.today.percentage, 100.0);
    assert_eq!(stats.week.completed, 20);
    assert_eq!(stats.week.total, 20);
    assert_eq!(stats.week.streak, 4);
}

#[test]
fn test_incomplete_day_keeps_stale_streak() {
    let mut store = store_with_goals(day(10));
    for d in 10..=13 {
        store.dispatch_at(DashboardAction::ResetDailyProgress, day(d));
        complete_all_goals(&mut store, day(d));
        store.sync_progress(day(d));
    }

    store.dispatch_at(DashboardAction::ResetDailyProgress, day(14));
    store.sync_progress(day(14));

    let progress = &store.state().progress;
    assert_eq!(progress.progress_history.len(), 5);
    assert_eq!(progress.current_streak, 4);

    let stats = store.progress_stats(day(14).date_naive());
    assert_eq!(stats.today.completed, 0);
    assert_eq!(stats.week.completed, 20);
    assert_eq!(stats.week.total, 25);
    assert_eq!(stats.week.percentage, 80.0);
    assert_eq!(stats.month.percentage, 80.0);
    // reported as the current week's percentage
    assert_eq!(stats.month.best_week, 80.0);
}

#[test]
fn test_targets_seeded_from_first_goal_set() {
    let mut store = store_with_goals(day(4));
    store.sync_progress(day(4));

    let weekly = store.state().progress.weekly_targets.clone();
    assert_eq!(weekly["1"], 70000.0);
    assert_eq!(store.state().progress.monthly_targets["5"], 150.0);

    // later goal changes do not re-seed
    store.dispatch_at(DashboardAction::RemoveGoal("1".to_string()), day(5));
    store.sync_progress(day(5));
    assert_eq!(store.state().progress.weekly_targets, weekly);
}

#[test]
fn test_history_window_rolls() {
    let start = day(1);
    let mut store = store_with_goals(start);

    let mut last = None;
    for offset in 0..100 {
        last = store.sync_progress(start + Duration::days(offset));
    }

    assert_eq!(last, Some(HistoryUpsert::Inserted { evicted: 1 }));
    let history = &store.state().progress.progress_history;
    assert_eq!(history.len(), 90);
    assert_eq!(history[0].date, (start + Duration::days(10)).date_naive());
}

#[test]
fn test_manual_streak_and_reset() {
    let mut store = store_with_goals(day(1));
    store.dispatch_at(ProgressAction::UpdateStreak(12), day(1));
    store.dispatch_at(ProgressAction::UpdateStreak(3), day(1));

    assert_eq!(store.state().progress.current_streak, 3);
    assert_eq!(store.state().progress.longest_streak, 12);

    store.dispatch_at(ProgressAction::ResetProgress, day(1));
    assert_eq!(store.state().progress.longest_streak, 0);
}

#[test]
fn test_stats_with_no_goals_or_history() {
    let stats = compute_progress_stats(&[], &[], 0, day(1).date_naive());
    assert_eq!(stats.today.percentage, 0.0);
    assert_eq!(stats.today.total, 0);
    assert_eq!(stats.against_plan.total_goals, 0);
}

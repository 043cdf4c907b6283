// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end flows across the onboarding, dashboard and risk slices

use chrono::{TimeZone, Utc};
use wellness_tracker::config::TrackingConfig;
use wellness_tracker::intelligence::ActivityShortcut;
use wellness_tracker::models::{
    ActivityLevel, BioSystem, Gender, GoalCategory, NewGoal, ProfileUpdate, RiskLevel,
};
use wellness_tracker::store::{
    Action, DashboardAction, OnboardingAction, OnboardingStep, RiskAction, Screen, Store,
};
use wellness_tracker::validation::{ProfileField, ValidationError};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap()
}

fn fill_form(store: &mut Store) {
    store.dispatch_at(
        OnboardingAction::UpdateProfile(ProfileUpdate {
            name: Some("Morgan".to_string()),
            age: Some("45".to_string()),
            phone: Some("555-0142".to_string()),
            gender: Some(Gender::Female),
            activity_level: Some(ActivityLevel::Sedentary),
            ..ProfileUpdate::default()
        }),
        now(),
    );
}

#[test]
fn test_onboarding_to_dashboard() {
    let mut store = Store::new(TrackingConfig::default());
    assert_eq!(store.root_screens(), &[Screen::Onboarding]);

    store.dispatch_at(OnboardingAction::NextStep, now());
    assert_eq!(store.state().onboarding.step(), OnboardingStep::UserInfo);

    let report = store
        .submit_profile(store.state().onboarding.user_profile.clone())
        .unwrap_err();
    assert_eq!(report.errors[&ProfileField::Age], ValidationError::InvalidAge);
    assert_eq!(store.state().onboarding.step(), OnboardingStep::UserInfo);

    fill_form(&mut store);
    store
        .submit_profile(store.state().onboarding.user_profile.clone())
        .unwrap();
    assert_eq!(store.state().onboarding.step(), OnboardingStep::Confirmation);

    store.dispatch_at(OnboardingAction::CompleteOnboarding, now());
    store.sync(now());

    assert_eq!(store.root_screens(), &[Screen::Dashboard, Screen::Progress, Screen::Risk]);
    let goals = &store.state().dashboard.wellness_goals;
    assert_eq!(goals.len(), 5);
    assert_eq!(store.state().dashboard.goal("1").unwrap().target, 5000.0);
    assert_eq!(store.state().dashboard.goal("4").unwrap().target, 15.0);
}

#[test]
fn test_risk_refresh_follows_goals() {
    let mut store = Store::new(TrackingConfig::default());
    fill_form(&mut store);
    store.dispatch_at(OnboardingAction::CompleteOnboarding, now());
    store.sync(now());

    let heart = |store: &Store| {
        store
            .state()
            .risk
            .current_risks
            .iter()
            .find(|r| r.id == "heart_disease")
            .cloned()
            .unwrap()
    };

    let before = heart(&store);
    assert_eq!(before.risk_percentage, 85.0);
    assert_eq!(before.risk_level, RiskLevel::Moderate);

    for _ in 0..3 {
        store.log_activity(ActivityShortcut::Walk, now()).unwrap();
    }
    store.log_activity(ActivityShortcut::Workout, now()).unwrap();
    store.refresh_risks(now());

    let after = heart(&store);
    assert!(after.risk_percentage < before.risk_percentage);
    assert_eq!(store.state().risk.risk_history.len(), 1);

    store.dispatch_at(RiskAction::SetBioSystemFilter(Some(BioSystem::Endocrine)), now());
    let filtered = store.state().risk.filtered_risks();
    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|r| r.bio_system == BioSystem::Endocrine));
}

#[test]
fn test_custom_goal_lifecycle() {
    let mut store = Store::new(TrackingConfig::default());
    fill_form(&mut store);
    store.sync(now());

    store.dispatch_at(
        DashboardAction::AddCustomGoal(NewGoal {
            title: "Meditation".to_string(),
            icon: "🧘".to_string(),
            current: 0.0,
            target: 20.0,
            unit: "minutes".to_string(),
            color: "#8E44AD".to_string(),
            category: GoalCategory::Wellness,
        }),
        now(),
    );

    let custom_id = store.state().dashboard.wellness_goals.last().unwrap().id.clone();
    assert!(uuid::Uuid::parse_str(&custom_id).is_ok());

    assert_eq!(store.quick_add(&custom_id, now()), Ok(1.0));
    assert_eq!(store.set_custom_progress(&custom_id, "45", now()), Ok(45.0));
    assert_eq!(store.set_custom_progress(&custom_id, "", now()), Ok(0.0));

    store.sync(now());
    assert_eq!(store.state().progress.progress_history[0].total_goals, 6);

    store.dispatch_at(DashboardAction::RemoveGoal(custom_id.clone()), now());
    assert!(store.state().dashboard.goal(&custom_id).is_none());
}

#[test]
fn test_actions_deserialize_from_json() {
    let mut store = Store::new(TrackingConfig::default());
    fill_form(&mut store);
    store.sync(now());

    let action: Action = serde_json::from_str(
        r#"{"slice":"dashboard","action":{"type":"increment_goal_progress","payload":{"goal_id":"2","increment":3.0}}}"#,
    )
    .unwrap();
    assert_eq!(action.name(), "increment_goal_progress");

    store.dispatch_at(action, now());
    assert_eq!(store.state().dashboard.goal("2").unwrap().current, 3.0);

    let reset: Action = serde_json::from_str(r#"{"slice":"onboarding","action":{"type":"reset_onboarding"}}"#).unwrap();
    store.dispatch_at(reset, now());
    assert_eq!(store.state().onboarding.user_profile.name, "");
}

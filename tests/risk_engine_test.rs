// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Risk engine behaviour through the public API

use chrono::Utc;
use wellness_tracker::intelligence::{
    calculate_risk_assessment, compliance_score, default_goals, generate_health_risks, RiskKind,
};
use wellness_tracker::models::{
    ActivityLevel, BioSystem, HealthRisk, RiskLevel, UserProfile, WellnessGoal,
};

fn profile(age: &str, level: Option<ActivityLevel>) -> UserProfile {
    UserProfile {
        name: "Test User".to_string(),
        age: age.to_string(),
        activity_level: level,
        ..UserProfile::default()
    }
}

fn completed_goals(level: ActivityLevel) -> Vec<WellnessGoal> {
    let mut goals = default_goals(level, Utc::now());
    for goal in &mut goals {
        goal.current = goal.target;
    }
    goals
}

fn risk<'a>(risks: &'a [HealthRisk], id: &str) -> &'a HealthRisk {
    risks.iter().find(|r| r.id == id).expect("risk present")
}

#[test]
fn test_sedentary_middle_aged_with_no_progress() {
    let goals = default_goals(ActivityLevel::Sedentary, Utc::now());
    let risks = generate_health_risks(&profile("45", Some(ActivityLevel::Sedentary)), &goals);

    assert_eq!(risks.len(), RiskKind::CATALOG.len());

    let heart = risk(&risks, "heart_disease");
    assert_eq!(heart.risk_percentage, 85.0);
    // heuristic level, not the threshold level
    assert_eq!(heart.risk_level, RiskLevel::Moderate);
    assert_eq!(RiskLevel::from_percentage(heart.risk_percentage), RiskLevel::Critical);

    let arthritis = risk(&risks, "osteoarthritis");
    assert_eq!(arthritis.risk_percentage, 51.5);
    assert_eq!(arthritis.risk_level, RiskLevel::Moderate);
}

#[test]
fn test_unparseable_age_uses_default() {
    let risks = generate_health_risks(&profile("abc", None), &[]);

    // age 35, compliance 50: 35 * 0.8 + 50 * 0.5
    let heart = risk(&risks, "heart_disease");
    assert_eq!(heart.risk_percentage, 53.0);
    assert_eq!(heart.risk_level, RiskLevel::Low);
}

#[test]
fn test_fully_compliant_young_user() {
    let goals = completed_goals(ActivityLevel::VeryActive);
    assert_eq!(compliance_score(&goals), 100.0);

    let risks = generate_health_risks(&profile("30", Some(ActivityLevel::VeryActive)), &goals);
    assert!(risks.iter().all(|r| r.risk_level == RiskLevel::Low));

    let assessment = calculate_risk_assessment(&risks);
    let expected_mean = 125.0 / 9.0;
    assert!((assessment.overall_risk_score - expected_mean).abs() < 1e-9);
    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert!((assessment.improvement_potential - (100.0 - expected_mean)).abs() < 1e-9);

    let top: Vec<&str> = assessment.top_risks.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(top, vec!["heart_disease", "osteoarthritis", "hypertension"]);
}

#[test]
fn test_percentages_stay_within_catalog_bounds() {
    let ages = ["", "1", "18", "35", "52", "80", "120", "-10", "999"];
    let levels = [None, Some(ActivityLevel::Sedentary), Some(ActivityLevel::ExtremelyActive)];

    for age in ages {
        for level in levels {
            for progress in [0.0, 0.5, 1.0, 1.5] {
                let mut goals = default_goals(ActivityLevel::ModeratelyActive, Utc::now());
                for goal in &mut goals {
                    goal.current = goal.target * progress;
                }

                let score = compliance_score(&goals);
                assert!((0.0..=100.0).contains(&score));

                let risks = generate_health_risks(&profile(age, level), &goals);
                for kind in RiskKind::CATALOG {
                    let entry = risk(&risks, kind.id());
                    let (min, max) = kind.bounds();
                    assert!(
                        entry.risk_percentage >= min && entry.risk_percentage <= max,
                        "{} out of bounds for age {:?}: {}",
                        kind.id(),
                        age,
                        entry.risk_percentage
                    );
                }
            }
        }
    }
}

#[test]
fn test_assessment_aggregates() {
    let goals = default_goals(ActivityLevel::LightlyActive, Utc::now());
    let risks = generate_health_risks(&profile("52", Some(ActivityLevel::LightlyActive)), &goals);
    let assessment = calculate_risk_assessment(&risks);

    let mean = risks.iter().map(|r| r.risk_percentage).sum::<f64>() / risks.len() as f64;
    assert!((assessment.overall_risk_score - mean).abs() < 1e-9);
    assert_eq!(assessment.risk_level, RiskLevel::from_percentage(mean));

    assert_eq!(assessment.bio_system_risks.len(), 6);
    let cardio = &assessment.bio_system_risks[&BioSystem::Cardiovascular];
    assert_eq!(cardio.risk_count, 2);
    assert_eq!(cardio.risk_level, RiskLevel::from_percentage(cardio.average_risk));

    assert_eq!(assessment.top_risks.len(), 3);
    assert!(assessment
        .top_risks
        .windows(2)
        .all(|pair| pair[0].risk_percentage >= pair[1].risk_percentage));

    // recomputing from the same input is stable
    assert_eq!(calculate_risk_assessment(&risks), assessment);
}

#[test]
fn test_small_and_empty_inputs() {
    let risks = generate_health_risks(&profile("40", None), &[]);
    let two = calculate_risk_assessment(&risks[..2]);
    assert_eq!(two.top_risks.len(), 2);

    let empty = calculate_risk_assessment(&[]);
    assert_eq!(empty.overall_risk_score, 0.0);
    assert_eq!(empty.risk_level, RiskLevel::Low);
    assert!(empty.bio_system_risks.is_empty());
    assert!(empty.top_risks.is_empty());
    assert_eq!(empty.improvement_potential, 100.0);
}

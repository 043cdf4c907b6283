// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rule-based health risk estimation
//!
//! Risks are derived from two inputs: the user's age and a compliance score
//! (how close the user is to their wellness goals). Each catalog entry has a
//! fixed affine formula clamped to its own bounds, and a separate heuristic
//! for its level. The heuristic level is independent from the
//! threshold classification used when aggregating.

use crate::constants::risk::{DEFAULT_AGE, DEFAULT_COMPLIANCE_SCORE, TOP_RISK_COUNT};
use crate::models::{
    ActivityLevel, BioSystem, BioSystemRisk, HealthRisk, RiskAssessment, RiskLevel, UserProfile,
    WellnessGoal,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Parse an age the way a lenient form field would: leading integer after
/// whitespace, falling back to [`DEFAULT_AGE`] when there is none
pub fn parse_age(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return DEFAULT_AGE;
    }

    digits
        .parse::<f64>()
        .map(|value| sign * value)
        .unwrap_or(DEFAULT_AGE)
}

/// Mean goal completion in percent, each goal capped at 100.
///
/// Returns [`DEFAULT_COMPLIANCE_SCORE`] for an empty goal set.
pub fn compliance_score(goals: &[WellnessGoal]) -> f64 {
    if goals.is_empty() {
        return DEFAULT_COMPLIANCE_SCORE;
    }

    goals
        .iter()
        .map(WellnessGoal::compliance_percentage)
        .sum::<f64>()
        / goals.len() as f64
}

/// Inputs shared by every catalog formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskInputs {
    pub age: f64,
    pub compliance_score: f64,
    pub activity_level: Option<ActivityLevel>,
}

impl RiskInputs {
    pub fn from_profile(profile: &UserProfile, goals: &[WellnessGoal]) -> Self {
        Self {
            age: parse_age(&profile.age),
            compliance_score: compliance_score(goals),
            activity_level: profile.activity_level,
        }
    }

    fn deficit(&self) -> f64 {
        100.0 - self.compliance_score
    }

    fn is_sedentary(&self) -> bool {
        self.activity_level == Some(ActivityLevel::Sedentary)
    }
}

/// The fixed health risk catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskKind {
    HeartDisease,
    Hypertension,
    TypeTwoDiabetes,
    MetabolicSyndrome,
    Osteoarthritis,
    Osteoporosis,
    CognitiveDecline,
    RespiratoryIssues,
    DigestiveIssues,
}

impl RiskKind {
    /// Catalog order; ties in the top-risk ranking keep this order
    pub const CATALOG: [RiskKind; 9] = [
        RiskKind::HeartDisease,
        RiskKind::Hypertension,
        RiskKind::TypeTwoDiabetes,
        RiskKind::MetabolicSyndrome,
        RiskKind::Osteoarthritis,
        RiskKind::Osteoporosis,
        RiskKind::CognitiveDecline,
        RiskKind::RespiratoryIssues,
        RiskKind::DigestiveIssues,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            RiskKind::HeartDisease => "heart_disease",
            RiskKind::Hypertension => "hypertension",
            RiskKind::TypeTwoDiabetes => "diabetes_t2",
            RiskKind::MetabolicSyndrome => "metabolic_syndrome",
            RiskKind::Osteoarthritis => "osteoarthritis",
            RiskKind::Osteoporosis => "osteoporosis",
            RiskKind::CognitiveDecline => "cognitive_decline",
            RiskKind::RespiratoryIssues => "respiratory_issues",
            RiskKind::DigestiveIssues => "digestive_issues",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RiskKind::HeartDisease => "Heart Disease",
            RiskKind::Hypertension => "Hypertension",
            RiskKind::TypeTwoDiabetes => "Type 2 Diabetes",
            RiskKind::MetabolicSyndrome => "Metabolic Syndrome",
            RiskKind::Osteoarthritis => "Osteoarthritis",
            RiskKind::Osteoporosis => "Osteoporosis",
            RiskKind::CognitiveDecline => "Cognitive Decline",
            RiskKind::RespiratoryIssues => "Respiratory Issues",
            RiskKind::DigestiveIssues => "Digestive Disorders",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskKind::HeartDisease => "Risk of coronary artery disease and heart complications based on lifestyle factors.",
            RiskKind::Hypertension => "Risk of high blood pressure based on lifestyle and age factors.",
            RiskKind::TypeTwoDiabetes => "Risk of developing insulin resistance and type 2 diabetes.",
            RiskKind::MetabolicSyndrome => "Risk of metabolic disorders affecting energy processing.",
            RiskKind::Osteoarthritis => "Risk of joint degeneration and mobility issues.",
            RiskKind::Osteoporosis => "Risk of bone density loss and fractures.",
            RiskKind::CognitiveDecline => "Risk of memory and cognitive function deterioration.",
            RiskKind::RespiratoryIssues => "Risk of breathing difficulties and lung function decline.",
            RiskKind::DigestiveIssues => "Risk of gastrointestinal problems and digestive health issues.",
        }
    }

    pub fn bio_system(&self) -> BioSystem {
        match self {
            RiskKind::HeartDisease | RiskKind::Hypertension => BioSystem::Cardiovascular,
            RiskKind::TypeTwoDiabetes | RiskKind::MetabolicSyndrome => BioSystem::Endocrine,
            RiskKind::Osteoarthritis | RiskKind::Osteoporosis => BioSystem::Musculoskeletal,
            RiskKind::CognitiveDecline => BioSystem::Neurological,
            RiskKind::RespiratoryIssues => BioSystem::Respiratory,
            RiskKind::DigestiveIssues => BioSystem::Digestive,
        }
    }

    pub fn organ(&self) -> &'static str {
        match self {
            RiskKind::HeartDisease => "Heart",
            RiskKind::Hypertension => "Blood vessels",
            RiskKind::TypeTwoDiabetes => "Pancreas",
            RiskKind::MetabolicSyndrome => "Multiple organs",
            RiskKind::Osteoarthritis => "Joints",
            RiskKind::Osteoporosis => "Bones",
            RiskKind::CognitiveDecline => "Brain",
            RiskKind::RespiratoryIssues => "Lungs",
            RiskKind::DigestiveIssues => "Gastrointestinal tract",
        }
    }

    pub fn factors(&self) -> &'static [&'static str] {
        match self {
            RiskKind::HeartDisease => &["Age", "Physical inactivity", "Poor diet", "Stress levels"],
            RiskKind::Hypertension => &["Sedentary lifestyle", "High sodium intake", "Stress", "Age"],
            RiskKind::TypeTwoDiabetes => &["Poor diet", "Physical inactivity", "Age", "Weight management"],
            RiskKind::MetabolicSyndrome => &["Poor nutrition", "Lack of exercise", "Sleep deprivation"],
            RiskKind::Osteoarthritis => &["Age", "Physical inactivity", "Weight bearing", "Previous injuries"],
            RiskKind::Osteoporosis => &["Age", "Lack of weight-bearing exercise", "Poor nutrition", "Vitamin D deficiency"],
            RiskKind::CognitiveDecline => &["Age", "Physical inactivity", "Poor sleep", "Chronic stress"],
            RiskKind::RespiratoryIssues => &["Physical inactivity", "Poor air quality", "Stress", "Age"],
            RiskKind::DigestiveIssues => &["Poor diet", "Stress", "Irregular eating", "Lack of fiber"],
        }
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            RiskKind::HeartDisease => &["Regular cardio exercise", "Heart-healthy diet", "Stress management"],
            RiskKind::Hypertension => &["Reduce sodium intake", "Regular exercise", "Weight management"],
            RiskKind::TypeTwoDiabetes => &["Balanced diet", "Regular exercise", "Weight control"],
            RiskKind::MetabolicSyndrome => &["Improve diet quality", "Increase physical activity", "Better sleep"],
            RiskKind::Osteoarthritis => &["Low-impact exercise", "Weight management", "Joint mobility work"],
            RiskKind::Osteoporosis => &["Weight-bearing exercises", "Calcium and Vitamin D", "Resistance training"],
            RiskKind::CognitiveDecline => &["Regular exercise", "Mental stimulation", "Quality sleep", "Stress reduction"],
            RiskKind::RespiratoryIssues => &["Cardiovascular exercise", "Breathing exercises", "Clean air exposure"],
            RiskKind::DigestiveIssues => &["Fiber-rich diet", "Regular meal times", "Stress management", "Hydration"],
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RiskKind::HeartDisease => "❤️",
            RiskKind::Hypertension => "🩸",
            RiskKind::TypeTwoDiabetes => "🍯",
            RiskKind::MetabolicSyndrome => "⚖️",
            RiskKind::Osteoarthritis | RiskKind::Osteoporosis => "🦴",
            RiskKind::CognitiveDecline => "🧠",
            RiskKind::RespiratoryIssues => "🫁",
            RiskKind::DigestiveIssues => "🫄",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskKind::HeartDisease => "#F44336",
            RiskKind::Hypertension => "#FF5722",
            RiskKind::TypeTwoDiabetes => "#FF9800",
            RiskKind::MetabolicSyndrome => "#FFC107",
            RiskKind::Osteoarthritis => "#795548",
            RiskKind::Osteoporosis => "#8D6E63",
            RiskKind::CognitiveDecline => "#9C27B0",
            RiskKind::RespiratoryIssues => "#00BCD4",
            RiskKind::DigestiveIssues => "#4CAF50",
        }
    }

    /// Inclusive `(min, max)` bounds of the percentage
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            RiskKind::HeartDisease => (10.0, 85.0),
            RiskKind::Hypertension => (15.0, 75.0),
            RiskKind::TypeTwoDiabetes => (8.0, 70.0),
            RiskKind::MetabolicSyndrome => (12.0, 65.0),
            RiskKind::Osteoarthritis => (5.0, 60.0),
            RiskKind::Osteoporosis => (3.0, 55.0),
            RiskKind::CognitiveDecline => (2.0, 45.0),
            RiskKind::RespiratoryIssues => (5.0, 40.0),
            RiskKind::DigestiveIssues => (8.0, 50.0),
        }
    }

    /// Unclamped formula value. Operand order matters for exact float results.
    fn raw_percentage(&self, inputs: &RiskInputs) -> f64 {
        let age = inputs.age;
        let deficit = inputs.deficit();
        match self {
            RiskKind::HeartDisease => age * 0.8 + deficit * 0.5,
            RiskKind::Hypertension => age * 0.6 + deficit * 0.4,
            RiskKind::TypeTwoDiabetes => age * 0.5 + deficit * 0.6,
            RiskKind::MetabolicSyndrome => deficit * 0.8 + age * 0.3,
            RiskKind::Osteoarthritis => {
                age * 0.7 + if inputs.is_sedentary() { 20.0 } else { 0.0 }
            }
            RiskKind::Osteoporosis => age * 0.4 + deficit * 0.3,
            RiskKind::CognitiveDecline => age * 0.3 + deficit * 0.2,
            RiskKind::RespiratoryIssues => deficit * 0.4 + age * 0.2,
            RiskKind::DigestiveIssues => deficit * 0.5 + age * 0.1,
        }
    }

    pub fn percentage(&self, inputs: &RiskInputs) -> f64 {
        let (min, max) = self.bounds();
        min.max(max.min(self.raw_percentage(inputs)))
    }

    /// Per-entry level heuristic: `Moderate` when the entry's condition holds
    pub fn heuristic_level(&self, inputs: &RiskInputs) -> RiskLevel {
        let age = inputs.age;
        let compliance = inputs.compliance_score;
        let elevated = match self {
            RiskKind::HeartDisease | RiskKind::CognitiveDecline => age > 40.0 && compliance < 60.0,
            RiskKind::Hypertension => age > 35.0 && inputs.is_sedentary(),
            RiskKind::TypeTwoDiabetes => age > 35.0 && compliance < 50.0,
            RiskKind::MetabolicSyndrome => compliance < 40.0,
            RiskKind::Osteoarthritis => age > 40.0 && inputs.is_sedentary(),
            RiskKind::Osteoporosis => age > 35.0 && compliance < 70.0,
            RiskKind::RespiratoryIssues => compliance < 50.0,
            RiskKind::DigestiveIssues => compliance < 60.0,
        };

        if elevated {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn evaluate(&self, inputs: &RiskInputs) -> HealthRisk {
        HealthRisk {
            id: self.id().to_string(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            risk_level: self.heuristic_level(inputs),
            risk_percentage: self.percentage(inputs),
            bio_system: self.bio_system(),
            organ: Some(self.organ().to_string()),
            factors: self.factors().iter().map(|f| f.to_string()).collect(),
            recommendations: self.recommendations().iter().map(|r| r.to_string()).collect(),
            icon: self.icon().to_string(),
            color: self.color().to_string(),
        }
    }
}

/// Evaluate the whole catalog for a profile and goal set
pub fn generate_health_risks(profile: &UserProfile, goals: &[WellnessGoal]) -> Vec<HealthRisk> {
    let inputs = RiskInputs::from_profile(profile, goals);
    debug!(
        age = inputs.age,
        compliance = inputs.compliance_score,
        goals = goals.len(),
        "Generating health risks"
    );

    RiskKind::CATALOG
        .iter()
        .map(|kind| kind.evaluate(&inputs))
        .collect()
}

/// Aggregate a risk list into an assessment.
///
/// An empty list yields a zero score, `Low` level, no breakdown and an
/// improvement potential of 100.
pub fn calculate_risk_assessment(risks: &[HealthRisk]) -> RiskAssessment {
    let overall_risk_score = if risks.is_empty() {
        0.0
    } else {
        risks.iter().map(|r| r.risk_percentage).sum::<f64>() / risks.len() as f64
    };

    let mut totals: BTreeMap<BioSystem, (f64, usize)> = BTreeMap::new();
    for risk in risks {
        let entry = totals.entry(risk.bio_system).or_insert((0.0, 0));
        entry.0 += risk.risk_percentage;
        entry.1 += 1;
    }

    let bio_system_risks = totals
        .into_iter()
        .map(|(system, (sum, count))| {
            let average_risk = sum / count as f64;
            (
                system,
                BioSystemRisk {
                    average_risk,
                    risk_level: RiskLevel::from_percentage(average_risk),
                    risk_count: count,
                },
            )
        })
        .collect();

    // sort_by is stable, so equal percentages keep catalog order
    let mut top_risks = risks.to_vec();
    top_risks.sort_by(|a, b| b.risk_percentage.total_cmp(&a.risk_percentage));
    top_risks.truncate(TOP_RISK_COUNT);

    RiskAssessment {
        overall_risk_score,
        risk_level: RiskLevel::from_percentage(overall_risk_score),
        bio_system_risks,
        top_risks,
        improvement_potential: (100.0 - overall_risk_score).clamp(0.0, 100.0),
    }
}

/// Multi-line detail text for a single risk
pub fn risk_detail(risk: &HealthRisk) -> String {
    let bullet = |items: &[String]| {
        items
            .iter()
            .map(|item| format!("• {}", item))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "{} - {}%\n{}\n\nOrgan: {}\nBio-System: {}\n\nKey Factors:\n{}\n\nRecommendations:\n{}",
        risk.name,
        format_percentage(risk.risk_percentage),
        risk.description,
        risk.organ.as_deref().unwrap_or("Multiple"),
        risk.bio_system,
        bullet(risk.factors.as_slice()),
        bullet(risk.recommendations.as_slice()),
    )
}

fn format_percentage(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoalCategory;
    use chrono::Utc;

    fn goal(id: &str, current: f64, target: f64) -> WellnessGoal {
        WellnessGoal {
            id: id.to_string(),
            title: format!("Goal {}", id),
            icon: String::new(),
            current,
            target,
            unit: "units".to_string(),
            color: "#000000".to_string(),
            category: GoalCategory::Wellness,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn inputs(age: f64, compliance_score: f64, activity_level: Option<ActivityLevel>) -> RiskInputs {
        RiskInputs {
            age,
            compliance_score,
            activity_level,
        }
    }

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age("45"), 45.0);
        assert_eq!(parse_age("  52 years"), 52.0);
        assert_eq!(parse_age("30.9"), 30.0);
        assert_eq!(parse_age(""), DEFAULT_AGE);
        assert_eq!(parse_age("abc"), DEFAULT_AGE);
        assert_eq!(parse_age("-"), DEFAULT_AGE);
    }

    #[test]
    fn test_compliance_score() {
        assert_eq!(compliance_score(&[]), 50.0);

        let goals = vec![goal("1", 50.0, 100.0), goal("2", 300.0, 100.0)];
        assert_eq!(compliance_score(&goals), 75.0);

        let idle = vec![goal("1", 0.0, 10.0), goal("2", 0.0, 8.0)];
        assert_eq!(compliance_score(&idle), 0.0);
    }

    #[test]
    fn test_heart_disease_example() {
        let profile = UserProfile {
            age: "45".to_string(),
            activity_level: Some(ActivityLevel::Sedentary),
            ..UserProfile::default()
        };
        let goals = vec![goal("1", 0.0, 5000.0), goal("2", 0.0, 8.0)];

        let risks = generate_health_risks(&profile, &goals);
        let heart = risks.iter().find(|r| r.id == "heart_disease").unwrap();

        assert_eq!(heart.risk_percentage, 85.0);
        assert_eq!(heart.risk_level, RiskLevel::Moderate);
        // heuristic level disagrees with the threshold classification
        assert_eq!(RiskLevel::from_percentage(heart.risk_percentage), RiskLevel::Critical);
    }

    #[test]
    fn test_catalog_covers_all_systems() {
        let risks = generate_health_risks(&UserProfile::default(), &[]);
        assert_eq!(risks.len(), RiskKind::CATALOG.len());

        for system in BioSystem::ALL {
            assert!(risks.iter().any(|r| r.bio_system == *system), "missing {}", system);
        }
    }

    #[test]
    fn test_percentages_stay_within_bounds() {
        let ages = [0.0, 1.0, 18.0, 35.0, 64.0, 120.0, 149.0];
        let compliances = [0.0, 25.0, 50.0, 99.9, 100.0];
        let levels = [None, Some(ActivityLevel::Sedentary), Some(ActivityLevel::VeryActive)];

        for kind in RiskKind::CATALOG {
            let (min, max) = kind.bounds();
            for &age in &ages {
                for &compliance in &compliances {
                    for &level in &levels {
                        let pct = kind.percentage(&inputs(age, compliance, level));
                        assert!(pct >= min && pct <= max, "{} = {} outside [{}, {}]", kind.id(), pct, min, max);
                    }
                }
            }
        }
    }

    #[test]
    fn test_osteoarthritis_uses_activity_level() {
        let sedentary = RiskKind::Osteoarthritis.percentage(&inputs(30.0, 50.0, Some(ActivityLevel::Sedentary)));
        let active = RiskKind::Osteoarthritis.percentage(&inputs(30.0, 50.0, Some(ActivityLevel::VeryActive)));
        assert_eq!(sedentary, 30.0 * 0.7 + 20.0);
        assert_eq!(active, 30.0 * 0.7);
    }

    #[test]
    fn test_assessment_aggregates() {
        let profile = UserProfile {
            age: "50".to_string(),
            ..UserProfile::default()
        };
        let risks = generate_health_risks(&profile, &[goal("1", 4.0, 8.0)]);
        let assessment = calculate_risk_assessment(&risks);

        let mean = risks.iter().map(|r| r.risk_percentage).sum::<f64>() / risks.len() as f64;
        assert!((assessment.overall_risk_score - mean).abs() < 1e-9);
        assert_eq!(assessment.risk_level, RiskLevel::from_percentage(mean));
        assert_eq!(assessment.top_risks.len(), 3);
        assert!(assessment.top_risks.windows(2).all(|w| w[0].risk_percentage >= w[1].risk_percentage));

        let cardio = &assessment.bio_system_risks[&BioSystem::Cardiovascular];
        assert_eq!(cardio.risk_count, 2);
        assert_eq!(assessment.bio_system_risks.len(), 6);
        assert!((assessment.improvement_potential - (100.0 - mean)).abs() < 1e-9);
    }

    #[test]
    fn test_assessment_empty_input() {
        let assessment = calculate_risk_assessment(&[]);
        assert_eq!(assessment.overall_risk_score, 0.0);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert!(assessment.bio_system_risks.is_empty());
        assert!(assessment.top_risks.is_empty());
        assert_eq!(assessment.improvement_potential, 100.0);
    }

    #[test]
    fn test_top_risks_ties_keep_catalog_order() {
        let mut risks = generate_health_risks(&UserProfile::default(), &[]);
        for risk in &mut risks {
            risk.risk_percentage = 40.0;
        }

        let assessment = calculate_risk_assessment(&risks);
        let ids: Vec<&str> = assessment.top_risks.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["heart_disease", "hypertension", "diabetes_t2"]);
    }

    #[test]
    fn test_risk_detail_text() {
        let risks = generate_health_risks(&UserProfile::default(), &[]);
        let detail = risk_detail(&risks[0]);
        assert!(detail.starts_with("Heart Disease - "));
        assert!(detail.contains("Organ: Heart"));
        assert!(detail.contains("• Stress management"));
    }
}

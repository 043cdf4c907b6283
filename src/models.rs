// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Core data structures shared by the risk engine, the progress aggregator
//! and the application state tree.
//!
//! ## Design Principles
//!
//! - **Tagged enums** replace free-form strings for gender, activity level,
//!   goal category, risk level and bio-system
//! - **Serializable**: every model round-trips through the persisted state tree
//! - **Unset is `None`**: profile fields that the user has not chosen yet are
//!   `Option`s instead of empty strings
//!
//! ## Core Models
//!
//! - [`UserProfile`]: onboarding data
//! - [`WellnessGoal`]: a daily goal with current and target values
//! - [`HealthRisk`] / [`RiskAssessment`]: risk engine output
//! - [`ProgressHistoryEntry`] / [`ProgressStats`]: progress aggregator input and output

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::risk::{CRITICAL_THRESHOLD, HIGH_THRESHOLD, MODERATE_THRESHOLD};

/// Error returned when a string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

/// Implements `as_str`, `Display` and `FromStr` over the serde names of a unit enum
macro_rules! string_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(UnknownVariant::new($kind, other, &[$($name),+])),
                }
            }
        }
    };
}

/// Self-reported gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

string_enum!(Gender, "gender", {
    Male => "male",
    Female => "female",
    Other => "other",
});

/// Self-reported activity level, drives default goal targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

string_enum!(ActivityLevel, "activity level", {
    Sedentary => "sedentary",
    LightlyActive => "lightly_active",
    ModeratelyActive => "moderately_active",
    VeryActive => "very_active",
    ExtremelyActive => "extremely_active",
});

/// User profile collected during onboarding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    /// Age as typed by the user; parsed leniently by the risk engine
    pub age: String,
    pub phone: String,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub fitness_goals: Vec<String>,
}

impl UserProfile {
    /// Merge a partial update into this profile; `None` fields are left as they are
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(age) = update.age {
            self.age = age;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(gender) = update.gender {
            self.gender = Some(gender);
        }
        if let Some(level) = update.activity_level {
            self.activity_level = Some(level);
        }
        if let Some(height) = update.height {
            self.height = Some(height);
        }
        if let Some(weight) = update.weight {
            self.weight = Some(weight);
        }
        if let Some(goals) = update.fitness_goals {
            self.fitness_goals = goals;
        }
    }
}

/// Partial profile update, one form step at a time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub fitness_goals: Option<Vec<String>>,
}

impl From<UserProfile> for ProfileUpdate {
    fn from(profile: UserProfile) -> Self {
        Self {
            name: Some(profile.name),
            age: Some(profile.age),
            phone: Some(profile.phone),
            gender: profile.gender,
            activity_level: profile.activity_level,
            height: profile.height,
            weight: profile.weight,
            fitness_goals: Some(profile.fitness_goals),
        }
    }
}

/// Wellness goal category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    Fitness,
    Nutrition,
    Wellness,
    Sleep,
}

string_enum!(GoalCategory, "goal category", {
    Fitness => "fitness",
    Nutrition => "nutrition",
    Wellness => "wellness",
    Sleep => "sleep",
});

/// A daily wellness goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellnessGoal {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub current: f64,
    /// Daily target; expected to be positive
    pub target: f64,
    pub unit: String,
    pub color: String,
    pub category: GoalCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WellnessGoal {
    /// `current / target`, or 0 when the target is not positive
    pub fn completion_ratio(&self) -> f64 {
        if self.target > 0.0 {
            self.current / self.target
        } else {
            0.0
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completion_ratio() >= 1.0
    }

    /// Completion percentage capped to [0, 100]
    pub fn compliance_percentage(&self) -> f64 {
        self.completion_ratio().clamp(0.0, 1.0) * 100.0
    }
}

/// Payload for a user-defined goal; id and timestamps are assigned on insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGoal {
    pub title: String,
    pub icon: String,
    pub current: f64,
    pub target: f64,
    pub unit: String,
    pub color: String,
    pub category: GoalCategory,
}

/// Dashboard counters for the current day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub steps_today: u32,
    pub water_intake: u32,
    pub sleep_hours: f64,
    pub calories_burned: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStatsUpdate {
    pub steps_today: Option<u32>,
    pub water_intake: Option<u32>,
    pub sleep_hours: Option<f64>,
    pub calories_burned: Option<u32>,
}

impl DailyStats {
    pub fn apply(&mut self, update: DailyStatsUpdate) {
        if let Some(steps) = update.steps_today {
            self.steps_today = steps;
        }
        if let Some(water) = update.water_intake {
            self.water_intake = water;
        }
        if let Some(sleep) = update.sleep_hours {
            self.sleep_hours = sleep;
        }
        if let Some(calories) = update.calories_burned {
            self.calories_burned = calories;
        }
    }
}

/// Habit streak counters shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    pub workout_streak: u32,
    pub nutrition_streak: u32,
    pub sleep_streak: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreaksUpdate {
    pub workout_streak: Option<u32>,
    pub nutrition_streak: Option<u32>,
    pub sleep_streak: Option<u32>,
}

impl Streaks {
    pub fn apply(&mut self, update: StreaksUpdate) {
        if let Some(workout) = update.workout_streak {
            self.workout_streak = workout;
        }
        if let Some(nutrition) = update.nutrition_streak {
            self.nutrition_streak = nutrition;
        }
        if let Some(sleep) = update.sleep_streak {
            self.sleep_streak = sleep;
        }
    }
}

/// Severity of a health risk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Low,
    Moderate,
    High,
    Critical,
}

string_enum!(RiskLevel, "risk level", {
    Low => "low",
    Moderate => "moderate",
    High => "high",
    Critical => "critical",
});

impl RiskLevel {
    /// Threshold classification: >= 70 critical, >= 50 high, >= 30 moderate
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= CRITICAL_THRESHOLD {
            RiskLevel::Critical
        } else if percentage >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if percentage >= MODERATE_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

/// Body system a health risk belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BioSystem {
    Cardiovascular,
    Neurological,
    Digestive,
    Musculoskeletal,
    Endocrine,
    Respiratory,
}

string_enum!(BioSystem, "bio-system", {
    Cardiovascular => "cardiovascular",
    Neurological => "neurological",
    Digestive => "digestive",
    Musculoskeletal => "musculoskeletal",
    Endocrine => "endocrine",
    Respiratory => "respiratory",
});

impl BioSystem {
    /// Short "learn more" blurb for the system
    pub fn description(&self) -> &'static str {
        match self {
            BioSystem::Cardiovascular => "Learn about heart health, blood pressure management, and cardiovascular exercise benefits.",
            BioSystem::Neurological => "Discover brain health tips, cognitive exercises, and neuroprotective lifestyle choices.",
            BioSystem::Digestive => "Explore digestive health, gut microbiome, and nutrition for optimal digestion.",
            BioSystem::Musculoskeletal => "Understand bone health, joint care, and exercises for strong muscles and bones.",
            BioSystem::Endocrine => "Learn about hormone balance, metabolism, and blood sugar management.",
            BioSystem::Respiratory => "Discover lung health, breathing techniques, and respiratory fitness.",
        }
    }

    /// Capitalized heading, e.g. "Cardiovascular System"
    pub fn title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => format!("{}{} System", first.to_uppercase(), chars.as_str()),
            None => String::new(),
        }
    }
}

/// One entry of the health risk catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRisk {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Heuristic level; not necessarily `RiskLevel::from_percentage(risk_percentage)`
    pub risk_level: RiskLevel,
    pub risk_percentage: f64,
    pub bio_system: BioSystem,
    pub organ: Option<String>,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub icon: String,
    pub color: String,
}

/// Aggregated risk for one bio-system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BioSystemRisk {
    pub average_risk: f64,
    pub risk_level: RiskLevel,
    pub risk_count: usize,
}

/// Aggregate over a set of health risks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk_score: f64,
    pub risk_level: RiskLevel,
    pub bio_system_risks: BTreeMap<BioSystem, BioSystemRisk>,
    pub top_risks: Vec<HealthRisk>,
    pub improvement_potential: f64,
}

/// Daily snapshot of a risk assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskHistoryEntry {
    pub date: NaiveDate,
    pub overall_score: f64,
    pub bio_system_scores: BTreeMap<BioSystem, f64>,
}

/// Daily snapshot of goal completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressHistoryEntry {
    pub date: NaiveDate,
    pub completed_goals: usize,
    pub total_goals: usize,
    /// Goal id to current value at the time of recording
    pub goal_progress: BTreeMap<String, f64>,
}

impl ProgressHistoryEntry {
    /// Snapshot the given goals for `date`
    pub fn from_goals(date: NaiveDate, goals: &[WellnessGoal]) -> Self {
        Self {
            date,
            completed_goals: goals.iter().filter(|g| g.is_completed()).count(),
            total_goals: goals.len(),
            goal_progress: goals
                .iter()
                .map(|g| (g.id.clone(), g.current))
                .collect(),
        }
    }

    /// A day counts toward the streak when every goal was met
    pub fn is_complete(&self) -> bool {
        self.completed_goals == self.total_goals
    }
}

/// Time range selected in the progress view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    #[default]
    Today,
    Week,
    Month,
}

string_enum!(TimeRange, "time range", {
    Today => "today",
    Week => "week",
    Month => "month",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayStats {
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekStats {
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    pub streak: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthStats {
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    /// Currently equal to the week percentage, not a maximum over the month
    pub best_week: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStats {
    pub on_track: usize,
    pub behind: usize,
    pub ahead: usize,
    pub total_goals: usize,
}

/// Output of the progress aggregator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub today: DayStats,
    pub week: WeekStats,
    pub month: MonthStats,
    pub against_plan: PlanStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(current: f64, target: f64) -> WellnessGoal {
        WellnessGoal {
            id: "g".to_string(),
            title: "Goal".to_string(),
            icon: String::new(),
            current,
            target,
            unit: "units".to_string(),
            color: "#000000".to_string(),
            category: GoalCategory::Fitness,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("lightly_active".parse::<ActivityLevel>(), Ok(ActivityLevel::LightlyActive));
        assert_eq!(" Female ".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!("respiratory".parse::<BioSystem>(), Ok(BioSystem::Respiratory));

        let err = "couch".parse::<ActivityLevel>().unwrap_err();
        assert!(err.to_string().contains("sedentary"));
    }

    #[test]
    fn test_enum_serde_names() {
        let json = serde_json::to_string(&ActivityLevel::ExtremelyActive).unwrap();
        assert_eq!(json, "\"extremely_active\"");

        let mut map = BTreeMap::new();
        map.insert(BioSystem::Endocrine, 1.0);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"endocrine":1.0}"#);
    }

    #[test]
    fn test_risk_level_thresholds() {
        assert_eq!(RiskLevel::from_percentage(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_percentage(29.99), RiskLevel::Low);
        assert_eq!(RiskLevel::from_percentage(30.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_percentage(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_percentage(70.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_percentage(100.0), RiskLevel::Critical);
    }

    #[test]
    fn test_goal_ratios() {
        assert_eq!(goal(50.0, 100.0).completion_ratio(), 0.5);
        assert!(goal(100.0, 100.0).is_completed());
        assert_eq!(goal(150.0, 100.0).compliance_percentage(), 100.0);
        assert_eq!(goal(5.0, 0.0).completion_ratio(), 0.0);
        assert!(!goal(5.0, 0.0).is_completed());
    }

    #[test]
    fn test_profile_partial_update() {
        let mut profile = UserProfile {
            name: "Sam".to_string(),
            age: "30".to_string(),
            ..UserProfile::default()
        };

        profile.apply(ProfileUpdate {
            age: Some("31".to_string()),
            activity_level: Some(ActivityLevel::VeryActive),
            ..ProfileUpdate::default()
        });

        assert_eq!(profile.name, "Sam");
        assert_eq!(profile.age, "31");
        assert_eq!(profile.activity_level, Some(ActivityLevel::VeryActive));
        assert_eq!(profile.gender, None);
    }

    #[test]
    fn test_history_entry_from_goals() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let goals = vec![goal(100.0, 100.0), goal(10.0, 100.0)];
        let entry = ProgressHistoryEntry::from_goals(today, &goals);

        assert_eq!(entry.completed_goals, 1);
        assert_eq!(entry.total_goals, 2);
        assert!(!entry.is_complete());
    }

    #[test]
    fn test_bio_system_title() {
        assert_eq!(BioSystem::Cardiovascular.title(), "Cardiovascular System");
    }
}

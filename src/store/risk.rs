// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Health risk state and its daily history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::progress::HistoryUpsert;
use crate::intelligence::{calculate_risk_assessment, generate_health_risks};
use crate::models::{
    BioSystem, HealthRisk, RiskAssessment, RiskHistoryEntry, RiskLevel, UserProfile, WellnessGoal,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskState {
    pub current_risks: Vec<HealthRisk>,
    pub risk_assessment: RiskAssessment,
    pub selected_bio_system: Option<BioSystem>,
    pub last_assessment_date: Option<DateTime<Utc>>,
    /// One entry per date, oldest first
    pub risk_history: Vec<RiskHistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum RiskAction {
    /// Regenerate the catalog from a profile and goal snapshot
    CalculateRisks {
        profile: UserProfile,
        goals: Vec<WellnessGoal>,
    },
    SetBioSystemFilter(Option<BioSystem>),
    /// Override one risk's percentage and re-aggregate
    UpdateRiskLevel { risk_id: String, new_percentage: f64 },
    ResetRiskAssessment,
}

impl RiskAction {
    pub fn name(&self) -> &'static str {
        match self {
            RiskAction::CalculateRisks { .. } => "calculate_risks",
            RiskAction::SetBioSystemFilter(_) => "set_bio_system_filter",
            RiskAction::UpdateRiskLevel { .. } => "update_risk_level",
            RiskAction::ResetRiskAssessment => "reset_risk_assessment",
        }
    }
}

impl RiskState {
    /// Risks of the selected bio-system, or all of them when no filter is set
    pub fn filtered_risks(&self) -> Vec<&HealthRisk> {
        self.current_risks
            .iter()
            .filter(|risk| {
                self.selected_bio_system
                    .map_or(true, |system| risk.bio_system == system)
            })
            .collect()
    }

    pub fn reduce(&mut self, action: RiskAction, now: DateTime<Utc>, history_limit: usize) -> Option<HistoryUpsert> {
        match action {
            RiskAction::CalculateRisks { profile, goals } => {
                let risks = generate_health_risks(&profile, &goals);
                self.risk_assessment = calculate_risk_assessment(&risks);
                self.current_risks = risks;
                self.last_assessment_date = Some(now);
                return Some(self.record_history(now, history_limit));
            }
            RiskAction::SetBioSystemFilter(system) => self.selected_bio_system = system,
            RiskAction::UpdateRiskLevel { risk_id, new_percentage } => {
                self.update_risk_percentage(&risk_id, new_percentage);
            }
            RiskAction::ResetRiskAssessment => *self = Self::default(),
        }
        None
    }

    /// Unknown ids leave the state untouched
    pub fn update_risk_percentage(&mut self, risk_id: &str, new_percentage: f64) -> bool {
        let Some(risk) = self.current_risks.iter_mut().find(|r| r.id == risk_id) else {
            debug!(risk_id = %risk_id, "Ignoring override for unknown risk");
            return false;
        };

        risk.risk_percentage = new_percentage;
        risk.risk_level = RiskLevel::from_percentage(new_percentage);
        self.risk_assessment = calculate_risk_assessment(&self.current_risks);
        true
    }

    fn record_history(&mut self, now: DateTime<Utc>, limit: usize) -> HistoryUpsert {
        let entry = RiskHistoryEntry {
            date: now.date_naive(),
            overall_score: self.risk_assessment.overall_risk_score,
            bio_system_scores: self
                .risk_assessment
                .bio_system_risks
                .iter()
                .map(|(system, risk)| (*system, risk.average_risk))
                .collect(),
        };

        match self.risk_history.iter_mut().find(|e| e.date == entry.date) {
            Some(existing) => {
                *existing = entry;
                HistoryUpsert::Updated
            }
            None => {
                self.risk_history.push(entry);
                let evicted = self.risk_history.len().saturating_sub(limit);
                self.risk_history.drain(..evicted);
                HistoryUpsert::Inserted { evicted }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::default_goals;
    use crate::models::ActivityLevel;
    use chrono::{Duration, TimeZone};

    fn profile() -> UserProfile {
        UserProfile {
            age: "45".to_string(),
            activity_level: Some(ActivityLevel::Sedentary),
            ..UserProfile::default()
        }
    }

    fn calculate(state: &mut RiskState, now: DateTime<Utc>) -> Option<HistoryUpsert> {
        state.reduce(
            RiskAction::CalculateRisks {
                profile: profile(),
                goals: default_goals(ActivityLevel::Sedentary, now),
            },
            now,
            30,
        )
    }

    #[test]
    fn test_calculate_records_history() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        let mut state = RiskState::default();

        assert_eq!(calculate(&mut state, now), Some(HistoryUpsert::Inserted { evicted: 0 }));
        assert_eq!(calculate(&mut state, now + Duration::hours(3)), Some(HistoryUpsert::Updated));

        assert_eq!(state.current_risks.len(), 9);
        assert_eq!(state.risk_history.len(), 1);
        assert_eq!(state.risk_history[0].overall_score, state.risk_assessment.overall_risk_score);
        assert_eq!(state.risk_history[0].bio_system_scores.len(), 6);
        assert_eq!(state.last_assessment_date, Some(now + Duration::hours(3)));
    }

    #[test]
    fn test_history_cap() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut state = RiskState::default();

        for day in 0..31 {
            calculate(&mut state, start + Duration::days(day));
        }

        assert_eq!(state.risk_history.len(), 30);
        assert_eq!(state.risk_history[0].date, (start + Duration::days(1)).date_naive());
    }

    #[test]
    fn test_update_risk_level_uses_thresholds() {
        let now = Utc::now();
        let mut state = RiskState::default();
        calculate(&mut state, now);

        state.reduce(
            RiskAction::UpdateRiskLevel {
                risk_id: "respiratory_issues".to_string(),
                new_percentage: 55.0,
            },
            now,
            30,
        );
        let risk = state
            .current_risks
            .iter()
            .find(|r| r.id == "respiratory_issues")
            .unwrap();
        assert_eq!(risk.risk_level, RiskLevel::High);
        assert_eq!(risk.risk_percentage, 55.0);
        assert_eq!(state.risk_assessment, calculate_risk_assessment(&state.current_risks));

        let before = state.clone();
        assert!(!state.update_risk_percentage("unknown", 99.0));
        assert_eq!(state, before);
    }

    #[test]
    fn test_bio_system_filter() {
        let mut state = RiskState::default();
        calculate(&mut state, Utc::now());
        assert_eq!(state.filtered_risks().len(), 9);

        state.reduce(RiskAction::SetBioSystemFilter(Some(BioSystem::Cardiovascular)), Utc::now(), 30);
        let filtered = state.filtered_risks();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.bio_system == BioSystem::Cardiovascular));

        state.reduce(RiskAction::ResetRiskAssessment, Utc::now(), 30);
        assert_eq!(state, RiskState::default());
    }
}

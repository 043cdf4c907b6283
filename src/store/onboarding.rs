// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Onboarding flow state

use serde::{Deserialize, Serialize};

use crate::constants::onboarding::LAST_STEP;
use crate::models::{ProfileUpdate, UserProfile};

/// Steps of the onboarding flow, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Welcome,
    UserInfo,
    Confirmation,
}

impl OnboardingStep {
    /// Step for an index, clamped to the last step
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => OnboardingStep::Welcome,
            1 => OnboardingStep::UserInfo,
            _ => OnboardingStep::Confirmation,
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            OnboardingStep::Welcome => 0,
            OnboardingStep::UserInfo => 1,
            OnboardingStep::Confirmation => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingState {
    pub current_step: u8,
    pub is_completed: bool,
    pub user_profile: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum OnboardingAction {
    UpdateProfile(ProfileUpdate),
    NextStep,
    PreviousStep,
    SetCurrentStep(u8),
    CompleteOnboarding,
    ResetOnboarding,
}

impl OnboardingAction {
    pub fn name(&self) -> &'static str {
        match self {
            OnboardingAction::UpdateProfile(_) => "update_profile",
            OnboardingAction::NextStep => "next_step",
            OnboardingAction::PreviousStep => "previous_step",
            OnboardingAction::SetCurrentStep(_) => "set_current_step",
            OnboardingAction::CompleteOnboarding => "complete_onboarding",
            OnboardingAction::ResetOnboarding => "reset_onboarding",
        }
    }
}

impl OnboardingState {
    pub fn step(&self) -> OnboardingStep {
        OnboardingStep::from_index(self.current_step)
    }

    pub fn reduce(&mut self, action: OnboardingAction) {
        match action {
            OnboardingAction::UpdateProfile(update) => self.user_profile.apply(update),
            OnboardingAction::NextStep => {
                self.current_step = self.current_step.saturating_add(1).min(LAST_STEP);
            }
            OnboardingAction::PreviousStep => {
                self.current_step = self.current_step.saturating_sub(1);
            }
            OnboardingAction::SetCurrentStep(step) => {
                self.current_step = step.min(LAST_STEP);
            }
            OnboardingAction::CompleteOnboarding => self.is_completed = true,
            OnboardingAction::ResetOnboarding => *self = Self::default(),
        }
    }
}

/// Top-level screens available to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Onboarding,
    Dashboard,
    Progress,
    Risk,
}

/// Onboarding until it is completed, then the three main tabs
pub fn root_screens(onboarding: &OnboardingState) -> &'static [Screen] {
    if onboarding.is_completed {
        &[Screen::Dashboard, Screen::Progress, Screen::Risk]
    } else {
        &[Screen::Onboarding]
    }
}

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Validation of the onboarding user-info form

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::constants::onboarding::MAX_AGE;
use crate::models::UserProfile;

/// Form fields that carry a validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    Age,
    Phone,
    Gender,
    ActivityLevel,
}

impl ProfileField {
    pub const ALL: [ProfileField; 5] = [
        ProfileField::Name,
        ProfileField::Age,
        ProfileField::Phone,
        ProfileField::Gender,
        ProfileField::ActivityLevel,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your name")]
    MissingName,
    #[error("Please enter a valid age")]
    InvalidAge,
    #[error("Please enter your phone number")]
    MissingPhone,
    #[error("Please select your gender")]
    MissingGender,
    #[error("Please select your activity level")]
    MissingActivityLevel,
}

impl ValidationError {
    pub fn field(&self) -> ProfileField {
        match self {
            ValidationError::MissingName => ProfileField::Name,
            ValidationError::InvalidAge => ProfileField::Age,
            ValidationError::MissingPhone => ProfileField::Phone,
            ValidationError::MissingGender => ProfileField::Gender,
            ValidationError::MissingActivityLevel => ProfileField::ActivityLevel,
        }
    }
}

/// Every failing field of a form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: BTreeMap<ProfileField, ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// First failure in form order
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.errors.values().next()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.values().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationReport {}

fn is_valid_age(raw: &str) -> bool {
    raw.trim()
        .parse::<f64>()
        .is_ok_and(|age| age.is_finite() && age > 0.0 && age < MAX_AGE)
}

/// Check a single field of the profile
pub fn validate_field(field: ProfileField, profile: &UserProfile) -> Result<(), ValidationError> {
    match field {
        ProfileField::Name if profile.name.trim().is_empty() => Err(ValidationError::MissingName),
        ProfileField::Age if !is_valid_age(&profile.age) => Err(ValidationError::InvalidAge),
        ProfileField::Phone if profile.phone.trim().is_empty() => Err(ValidationError::MissingPhone),
        ProfileField::Gender if profile.gender.is_none() => Err(ValidationError::MissingGender),
        ProfileField::ActivityLevel if profile.activity_level.is_none() => {
            Err(ValidationError::MissingActivityLevel)
        }
        _ => Ok(()),
    }
}

/// Check every field, collecting all failures
pub fn validate_profile(profile: &UserProfile) -> Result<(), ValidationReport> {
    let errors: BTreeMap<_, _> = ProfileField::ALL
        .iter()
        .filter_map(|field| validate_field(*field, profile).err().map(|e| (*field, e)))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationReport { errors })
    }
}

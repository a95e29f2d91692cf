use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::pet::PetSummary;

/// Lifecycle of an adoption application.
///
/// `Pending` is the only non-terminal state. `Cancelled` exists for
/// completeness of the status column; applicant cancellation deletes the row.
#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    #[display("pending")]
    Pending,
    #[display("approved")]
    Approved,
    #[display("rejected")]
    Rejected,
    #[display("cancelled")]
    Cancelled,
}

impl ApplicationStatus {
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (ApplicationStatus::Pending, ApplicationStatus::Approved)
                | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
                | (ApplicationStatus::Pending, ApplicationStatus::Cancelled)
        )
    }

    /// Statuses that block a new submission for the same applicant and pet
    pub fn blocks_new_submission(self) -> bool {
        !matches!(self, ApplicationStatus::Cancelled)
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "cancelled" => Ok(ApplicationStatus::Cancelled),
            other => Err(format!("unknown application status: {other}")),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HousingType {
    #[default]
    #[display("house")]
    House,
    #[display("apartment")]
    Apartment,
    #[display("condo")]
    Condo,
}

impl FromStr for HousingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "house" => Ok(HousingType::House),
            "apartment" => Ok(HousingType::Apartment),
            "condo" => Ok(HousingType::Condo),
            _ => Err("Housing type is required".into()),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdoptionApplication {
    pub id: i64,
    /// `None` for applications submitted without an account
    pub user_id: Option<i64>,
    pub pet_id: i64,
    pub full_name: String,
    pub email: String,
    /// Canonical `+91XXXXXXXXXX` form
    pub phone: String,
    pub address: String,
    pub housing_type: HousingType,
    pub has_yard: bool,
    pub has_other_pets: bool,
    pub experience: Option<String>,
    pub why_adopt: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationWithPet {
    #[serde(flatten)]
    pub application: AdoptionApplication,
    pub pet: Option<PetSummary>,
}

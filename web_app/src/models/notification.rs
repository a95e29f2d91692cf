use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;

use super::pet::Pet;

#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    #[default]
    #[display("application_approved")]
    ApplicationApproved,
    #[display("application_rejected")]
    ApplicationRejected,
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "application_approved" => Ok(NotificationType::ApplicationApproved),
            "application_rejected" => Ok(NotificationType::ApplicationRejected),
            other => Err(format!("unknown notification type: {other}")),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    /// Related ids (pet, application) for the client to link to
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn application_approved(user_id: i64, pet: &Pet, application_id: i64) -> Self {
        Self {
            id: 0,
            user_id,
            notification_type: NotificationType::ApplicationApproved,
            title: "Adoption application approved".into(),
            message: format!(
                "Great news! Your application to adopt {} has been approved.",
                pet.name
            ),
            is_read: false,
            metadata: json!({
                "pet_id": pet.id,
                "pet_slug": pet.slug,
                "application_id": application_id,
            }),
            created_at: Utc::now(),
        }
    }

    pub fn application_rejected(user_id: i64, pet: &Pet, application_id: i64) -> Self {
        Self {
            id: 0,
            user_id,
            notification_type: NotificationType::ApplicationRejected,
            title: "Adoption application update".into(),
            message: format!(
                "Your application to adopt {} was not approved this time.",
                pet.name
            ),
            is_read: false,
            metadata: json!({
                "pet_id": pet.id,
                "pet_slug": pet.slug,
                "application_id": application_id,
            }),
            created_at: Utc::now(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub is_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn create_default_from_email(email: &str) -> Self {
        Self {
            id: 0,
            email: email.to_string(),
            is_enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

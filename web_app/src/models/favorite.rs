use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pet::PetSummary;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteWithPet {
    pub id: i64,
    pub user_id: i64,
    pub pet_id: i64,
    pub created_at: DateTime<Utc>,
    pub pet: Option<PetSummary>,
}

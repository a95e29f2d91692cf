use serde::{Deserialize, Serialize};

/// Raw fields of the new pet form, as received before validation
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct NewPetForm {
    /// Optional explicit slug, derived from `name` when empty
    pub slug: String,
    pub name: String,
    pub pet_type: String,
    pub breed: String,
    pub age: String,
    pub gender: String,
    pub weight: String,
    pub color: String,
    pub location: String,
    pub description: String,
    pub health_status: String,
    pub vaccinated: String,
    pub neutered: String,
    /// Comma separated tags
    pub personality: String,
    pub image: Option<crate::models::Pic>,
}

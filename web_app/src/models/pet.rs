use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PetType {
    #[default]
    #[display("dog")]
    Dog,
    #[display("cat")]
    Cat,
}

impl FromStr for PetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dog" => Ok(PetType::Dog),
            "cat" => Ok(PetType::Cat),
            _ => Err("Pet type is required".into()),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Gender {
    #[default]
    #[display("Male")]
    Male,
    #[display("Female")]
    Female,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err("Gender is required".into()),
        }
    }
}

/// A pet listed for adoption.
///
/// `age`, `weight` and the health fields are free text as entered by the owner
/// (e.g. `"3 years"`, `"12 kg"`). A pet is never deleted; adoption only flips
/// `is_adopted` and records the adopter.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub pet_type: PetType,
    pub breed: String,
    pub age: String,
    pub gender: Gender,
    pub weight: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub health_status: Option<String>,
    pub vaccinated: Option<String>,
    pub neutered: Option<String>,
    pub personality: Vec<String>,
    pub image_url: Option<String>,
    pub owner_id: Option<i64>,
    pub is_adopted: bool,
    pub adopted_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pet {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == Some(user_id)
    }
}

/// Reduced pet view embedded in applications and favorites listings
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct PetSummary {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub breed: String,
    pub age: String,
    pub gender: Gender,
    pub image_url: Option<String>,
}

impl From<&Pet> for PetSummary {
    fn from(pet: &Pet) -> Self {
        PetSummary {
            id: pet.id,
            slug: pet.slug.clone(),
            name: pet.name.clone(),
            breed: pet.breed.clone(),
            age: pet.age.clone(),
            gender: pet.gender,
            image_url: pet.image_url.clone(),
        }
    }
}

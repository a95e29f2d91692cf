use serde::{Deserialize, Serialize};

/// Veterinary clinic from the reference directory
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vet {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub area: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub services: Vec<String>,
    pub emergency_available: bool,
    pub rating: Option<f64>,
    pub total_reviews: Option<i64>,
}

/// Clinic returned by the nearby-search provider
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NearbyVet {
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i64>,
    pub open_now: Option<bool>,
    pub place_id: String,
}

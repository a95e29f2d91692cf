pub mod notification;
pub mod places;
pub mod storage;

use crate::models;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn save_pic(&self, path: &str, body: Vec<u8>) -> anyhow::Result<()>;

    /// Public URL where a stored object can be fetched
    fn public_url(&self, path: &str) -> String;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NearbySearchService: Send + Sync {
    async fn search_nearby_vets(
        &self,
        lat: f64,
        lng: f64,
    ) -> anyhow::Result<Vec<models::vet::NearbyVet>>;
}

pub type ImplStorageService = Box<dyn StorageService>;
pub type ImplNearbySearchService = Box<dyn NearbySearchService>;

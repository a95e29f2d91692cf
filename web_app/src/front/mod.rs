//! Web layer: JSON handlers over the [api](crate::api) workflows.

pub mod adopt;
pub mod applications;
pub mod auth;
pub mod dashboard;
pub mod errors;
pub mod favorites;
pub mod forms;
pub mod middleware;
pub mod notifications;
pub mod oauth;
pub mod pets;
pub mod routes;
pub mod server;
pub mod session;
pub mod utils;
pub mod vets;

use crate::{api, repo, services};
use csrf::AesGcmCsrfProtection;

pub struct AppState {
    pub csrf_protec: AesGcmCsrfProtection,
    pub repo: repo::ImplAppRepo,
    pub storage_service: services::ImplStorageService,
    pub nearby_search_service: services::ImplNearbySearchService,
    pub notification_hub: services::notification::NotificationHub,
    pub workflow: api::adoption::WorkflowOptions,
}

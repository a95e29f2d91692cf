pub mod sqlite;
pub mod sqlite_queries;
#[cfg(test)]
pub mod testing;

use crate::models;
use async_trait::async_trait;

/// Writes applied in a single transaction when an owner accepts an application
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalRequest {
    pub application_id: i64,
    pub pet_id: i64,
    /// Recorded as `pets.adopted_by`; `None` for applications without an account
    pub adopter_id: Option<i64>,
    pub notification: Option<models::notification::Notification>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    Approved {
        rejected_siblings: u64,
        /// The stored notification, with its assigned id
        notification: Option<models::notification::Notification>,
    },
    /// Another request already moved the application out of `pending`
    ApplicationNotPending,
    /// The pet was adopted through a different application
    PetAlreadyAdopted,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppRepo: Send + Sync {
    async fn get_user_app_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<models::user_app::User>>;

    async fn insert_user_app(&self, app_user: &models::user_app::User) -> anyhow::Result<i64>;

    async fn insert_pet(&self, pet: &models::pet::Pet) -> anyhow::Result<i64>;

    async fn get_pet_by_id(&self, pet_id: i64) -> anyhow::Result<Option<models::pet::Pet>>;

    async fn get_pet_by_slug(&self, slug: &str) -> anyhow::Result<Option<models::pet::Pet>>;

    /// All pets, newest first
    async fn get_all_pets(&self) -> anyhow::Result<Vec<models::pet::Pet>>;

    async fn get_owned_pet_ids(&self, owner_id: i64) -> anyhow::Result<Vec<i64>>;

    async fn get_pet_summaries_by_ids(
        &self,
        pet_ids: &[i64],
    ) -> anyhow::Result<Vec<models::pet::PetSummary>>;

    async fn insert_adoption_application(
        &self,
        application: &models::adoption::AdoptionApplication,
    ) -> anyhow::Result<i64>;

    async fn get_application_by_id(
        &self,
        application_id: i64,
    ) -> anyhow::Result<Option<models::adoption::AdoptionApplication>>;

    /// Latest application for `pet_id` made by the same account or, failing
    /// that, the same email address
    async fn find_applicant_application(
        &self,
        pet_id: i64,
        user_id: Option<i64>,
        email: &str,
    ) -> anyhow::Result<Option<models::adoption::AdoptionApplication>>;

    async fn get_latest_user_application(
        &self,
        user_id: i64,
    ) -> anyhow::Result<Option<models::adoption::AdoptionApplication>>;

    async fn get_user_applications(
        &self,
        user_id: i64,
    ) -> anyhow::Result<Vec<models::adoption::ApplicationWithPet>>;

    async fn get_received_applications(
        &self,
        owner_id: i64,
        status: Option<models::adoption::ApplicationStatus>,
    ) -> anyhow::Result<Vec<models::adoption::ApplicationWithPet>>;

    async fn get_applications_by_pet_ids(
        &self,
        pet_ids: &[i64],
        status: Option<models::adoption::ApplicationStatus>,
    ) -> anyhow::Result<Vec<models::adoption::AdoptionApplication>>;

    async fn approve_application(&self, request: &ApprovalRequest)
    -> anyhow::Result<ApprovalOutcome>;

    /// Returns `false` when the application was no longer pending
    async fn reject_application(&self, application_id: i64) -> anyhow::Result<bool>;

    /// Returns `false` when no pending application matched `application_id` and `user_id`
    async fn delete_pending_application(
        &self,
        application_id: i64,
        user_id: i64,
    ) -> anyhow::Result<bool>;

    async fn insert_favorite(&self, user_id: i64, pet_id: i64) -> anyhow::Result<()>;

    async fn delete_favorite(&self, user_id: i64, pet_id: i64) -> anyhow::Result<()>;

    async fn is_pet_favorite(&self, user_id: i64, pet_id: i64) -> anyhow::Result<bool>;

    async fn get_user_favorite_pet_ids(&self, user_id: i64) -> anyhow::Result<Vec<i64>>;

    async fn get_user_favorites(
        &self,
        user_id: i64,
    ) -> anyhow::Result<Vec<models::favorite::FavoriteWithPet>>;

    async fn insert_notification(
        &self,
        notification: &models::notification::Notification,
    ) -> anyhow::Result<i64>;

    async fn get_user_notifications(
        &self,
        user_id: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<models::notification::Notification>>;

    async fn mark_notification_read(
        &self,
        user_id: i64,
        notification_id: i64,
    ) -> anyhow::Result<bool>;

    /// Number of unread notifications of `user_id`, not limited to a page
    async fn count_unread_notifications(&self, user_id: i64) -> anyhow::Result<i64>;

    /// Marks every unread notification of `user_id` as read
    async fn mark_all_notifications_read(&self, user_id: i64) -> anyhow::Result<u64>;

    async fn get_vets(&self, city: Option<String>) -> anyhow::Result<Vec<models::vet::Vet>>;
}

pub type ImplAppRepo = Box<dyn AppRepo>;

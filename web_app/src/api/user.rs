//! # User API Module
//!
//! Accounts are created on first sign-in and looked up by email afterwards.

use crate::{metric, models, repo};

/// Gets an existing user by email or creates a new one if not found.
///
/// # Arguments
/// * `repo` - Repository instance for database operations
/// * `email` - Email address to look up or create user for
///
/// # Returns
/// * `anyhow::Result<models::user_app::User>` - The existing or newly created user
///
/// # Errors
/// Returns an error if database operations fail during user lookup or creation.
pub async fn get_or_create_app_user_by_email(
    repo: &repo::ImplAppRepo,
    email: &str,
) -> anyhow::Result<models::user_app::User> {
    if let Some(user) = repo.get_user_app_by_email(email).await? {
        return Ok(user);
    }

    let mut user = models::user_app::User::create_default_from_email(email);
    user.id = repo.insert_user_app(&user).await?;

    metric::incr_user_action_statds("create_user");
    Ok(user)
}

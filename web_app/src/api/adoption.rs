//! # Adoption API Module
//!
//! The adoption application lifecycle: submit, accept, reject, cancel, and the
//! applicant and owner listings.
//!
//! Status moves from `pending` to `approved` or `rejected` by the pet's owner.
//! Accepting runs as a single store transaction that also marks the pet as
//! adopted, rejects the other pending applications for that pet, and stores a
//! notification for the applicant. The notification is published to the
//! [`NotificationHub`] once the transaction has committed.

use crate::services::notification::NotificationHub;
use crate::{consts, metric, models, repo};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

use super::errors::{AppError, AppResult};

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+?91|0)?([6-9]\d{9})$").unwrap());

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Normalizes an Indian mobile number to `+91XXXXXXXXXX`.
///
/// Spaces, dashes, dots and parentheses are ignored, and an optional `+91`,
/// `91` or `0` prefix is accepted. Returns `None` when the digits do not form
/// a mobile number.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();

    PHONE_REGEX
        .captures(&compact)
        .and_then(|caps| caps.get(1))
        .map(|number| format!("+91{}", number.as_str()))
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Behaviour switches for the review step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Store and publish a notification when an application is rejected
    pub notify_on_rejection: bool,
}

/// Adoption form as sent by the applicant
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub housing_type: String,
    #[serde(default)]
    pub has_yard: bool,
    #[serde(default)]
    pub has_other_pets: bool,
    #[serde(default)]
    pub experience: Option<String>,
    pub why_adopt: String,
}

impl ApplicationForm {
    /// Checks every field and builds a `pending` application for `pet_id`.
    fn into_application(
        self,
        pet_id: i64,
        user_id: Option<i64>,
    ) -> AppResult<models::adoption::AdoptionApplication> {
        let full_name = self.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AppError::Validation("Full name is required".into()));
        }

        let email = self.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(AppError::Validation(
                "Please enter a valid email address".into(),
            ));
        }

        let phone = normalize_phone(&self.phone).ok_or_else(|| {
            AppError::Validation("Please enter a valid 10 digit Indian mobile number".into())
        })?;

        let address = self.address.trim().to_string();
        if address.is_empty() {
            return Err(AppError::Validation("Address is required".into()));
        }

        let housing_type = self
            .housing_type
            .parse::<models::adoption::HousingType>()
            .map_err(AppError::Validation)?;

        let why_adopt = self.why_adopt.trim().to_string();
        if why_adopt.is_empty() {
            return Err(AppError::Validation(
                "Please tell us why you want to adopt".into(),
            ));
        }

        let now = chrono::Utc::now();
        Ok(models::adoption::AdoptionApplication {
            id: 0,
            user_id,
            pet_id,
            full_name,
            email,
            phone,
            address,
            housing_type,
            has_yard: self.has_yard,
            has_other_pets: self.has_other_pets,
            experience: self
                .experience
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            why_adopt,
            status: models::adoption::ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

fn duplicate_message(status: models::adoption::ApplicationStatus, pet_name: &str) -> String {
    match status {
        models::adoption::ApplicationStatus::Approved => {
            format!("Your application for {pet_name} has already been approved.")
        }
        models::adoption::ApplicationStatus::Rejected => format!(
            "Your previous application for {pet_name} was not approved, so a new one cannot be submitted."
        ),
        _ => format!(
            "You already have a pending application for {pet_name}. We'll get back to you soon."
        ),
    }
}

/// Submits an adoption application for the pet identified by `pet_slug`.
///
/// # Arguments
/// * `repo` - Repository instance for database operations
/// * `user_id` - Applicant account, `None` when applying without one
/// * `pet_slug` - Slug of the pet to adopt
/// * `form` - Applicant supplied fields
///
/// # Returns
/// * `AppResult<AdoptionApplication>` - The stored `pending` application
///
/// # Errors
/// * [`AppError::Validation`] - a field is missing or malformed, or the pet was already adopted
/// * [`AppError::NotFound`] - no pet with that slug
/// * [`AppError::DuplicateApplication`] - the applicant already applied for this pet
/// * [`AppError::Persistence`] - the store rejected the insert
///
/// The duplicate check is a read before the insert, two concurrent
/// submissions by the same applicant can both pass it.
pub async fn submit_application(
    repo: &repo::ImplAppRepo,
    user_id: Option<i64>,
    pet_slug: &str,
    form: ApplicationForm,
) -> AppResult<models::adoption::AdoptionApplication> {
    let _span = logfire::span!("submit_application").entered();

    let mut application = form.into_application(0, user_id)?;

    let pet = repo
        .get_pet_by_slug(pet_slug)
        .await?
        .ok_or_else(|| AppError::NotFound("The selected pet could not be found.".into()))?;

    if pet.is_adopted {
        return Err(AppError::Validation(format!(
            "{} has already been adopted.",
            pet.name
        )));
    }

    if let Some(previous) = repo
        .find_applicant_application(pet.id, user_id, &application.email)
        .await?
        .filter(|previous| previous.status.blocks_new_submission())
    {
        return Err(AppError::DuplicateApplication(duplicate_message(
            previous.status,
            &pet.name,
        )));
    }

    application.pet_id = pet.id;
    application.id = repo.insert_adoption_application(&application).await?;

    metric::incr_adoption_action_statds("submit");
    Ok(application)
}

/// Application and pet of a review, after checking the caller owns the pet
/// and the application can still move to `next`.
async fn load_for_review(
    repo: &repo::ImplAppRepo,
    owner_id: i64,
    application_id: i64,
    next: models::adoption::ApplicationStatus,
) -> AppResult<(models::adoption::AdoptionApplication, models::pet::Pet)> {
    let application = repo
        .get_application_by_id(application_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".into()))?;

    let pet = repo
        .get_pet_by_id(application.pet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Pet not found".into()))?;

    if pet.owner_id.is_none() {
        return Err(AppError::Forbidden(
            "This pet has no owner who can review applications".into(),
        ));
    }
    if !pet.is_owned_by(owner_id) {
        return Err(AppError::Forbidden(
            "Only the pet's owner can review its applications".into(),
        ));
    }

    if !application.status.can_transition_to(next) {
        return Err(AppError::Validation(format!(
            "Application is already {}",
            application.status
        )));
    }

    Ok((application, pet))
}

/// Effects of a successful accept
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptSummary {
    pub application_id: i64,
    pub pet_id: i64,
    pub rejected_siblings: u64,
    pub notified: bool,
}

/// Accepts an application on behalf of the pet's owner.
///
/// # Process
/// 1. Load the application and its pet, check ownership and `pending` status
/// 2. In one transaction: approve it, mark the pet adopted by the applicant,
///    reject the other pending applications for the pet, store an approval
///    notification when the applicant has an account
/// 3. Publish the stored notification
///
/// # Errors
/// * [`AppError::NotFound`] - application or pet missing
/// * [`AppError::Forbidden`] - the pet has no owner, or the caller is not the owner
/// * [`AppError::Validation`] - the application is no longer pending, or the
///   pet was adopted meanwhile; nothing is written in both cases
/// * [`AppError::Persistence`] - the transaction failed and was rolled back
pub async fn accept_application(
    repo: &repo::ImplAppRepo,
    hub: &NotificationHub,
    owner_id: i64,
    application_id: i64,
) -> AppResult<AcceptSummary> {
    let _span = logfire::span!("accept_application").entered();

    let (application, pet) = load_for_review(
        repo,
        owner_id,
        application_id,
        models::adoption::ApplicationStatus::Approved,
    )
    .await?;

    let request = repo::ApprovalRequest {
        application_id: application.id,
        pet_id: pet.id,
        adopter_id: application.user_id,
        notification: application.user_id.map(|user_id| {
            models::notification::Notification::application_approved(user_id, &pet, application.id)
        }),
    };

    match repo.approve_application(&request).await? {
        repo::ApprovalOutcome::Approved {
            rejected_siblings,
            notification,
        } => {
            let notified = notification.is_some();
            if let Some(notification) = notification {
                hub.publish(notification);
            }

            metric::incr_adoption_action_statds("accept");
            Ok(AcceptSummary {
                application_id: application.id,
                pet_id: pet.id,
                rejected_siblings,
                notified,
            })
        }
        repo::ApprovalOutcome::ApplicationNotPending => Err(AppError::Validation(
            "Application is no longer pending".into(),
        )),
        repo::ApprovalOutcome::PetAlreadyAdopted => Err(AppError::Validation(format!(
            "{} has already been adopted.",
            pet.name
        ))),
    }
}

/// Rejects a single application. Other applications for the pet are untouched.
///
/// A notification is stored and published only when
/// [`WorkflowOptions::notify_on_rejection`] is set and the applicant has an
/// account. Failing to store it does not undo the rejection.
pub async fn reject_application(
    repo: &repo::ImplAppRepo,
    hub: &NotificationHub,
    options: WorkflowOptions,
    owner_id: i64,
    application_id: i64,
) -> AppResult<()> {
    let _span = logfire::span!("reject_application").entered();

    let (application, pet) = load_for_review(
        repo,
        owner_id,
        application_id,
        models::adoption::ApplicationStatus::Rejected,
    )
    .await?;

    if !repo.reject_application(application.id).await? {
        return Err(AppError::Validation(
            "Application is no longer pending".into(),
        ));
    }
    metric::incr_adoption_action_statds("reject");

    if let (true, Some(user_id)) = (options.notify_on_rejection, application.user_id) {
        let mut notification =
            models::notification::Notification::application_rejected(user_id, &pet, application.id);
        match repo.insert_notification(&notification).await {
            Ok(id) => {
                notification.id = id;
                hub.publish(notification);
            }
            Err(err) => {
                tracing::warn!(
                    "application {} rejected but notification failed: {:#}",
                    application.id,
                    err
                );
            }
        }
    }

    Ok(())
}

/// Removes the caller's own `pending` application.
///
/// # Errors
/// * [`AppError::NotFound`] - no pending application with that id belongs to `user_id`
pub async fn cancel_application(
    repo: &repo::ImplAppRepo,
    user_id: i64,
    application_id: i64,
) -> AppResult<()> {
    if !repo
        .delete_pending_application(application_id, user_id)
        .await?
    {
        return Err(AppError::NotFound(
            "No pending application found to cancel".into(),
        ));
    }

    metric::incr_adoption_action_statds("cancel");
    Ok(())
}

/// One page of a listing, `page` starts at 1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn from_items(items: Vec<T>, page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total = items.len();
        let total_pages = total.div_ceil(page_size).max(1);

        Self {
            items: items
                .into_iter()
                .skip((page - 1).saturating_mul(page_size))
                .take(page_size)
                .collect(),
            page,
            total,
            total_pages,
        }
    }
}

/// Applications submitted by `user_id`, newest first.
pub async fn list_my_applications(
    repo: &repo::ImplAppRepo,
    user_id: i64,
    page: usize,
) -> AppResult<Page<models::adoption::ApplicationWithPet>> {
    let applications = repo.get_user_applications(user_id).await?;

    Ok(Page::from_items(
        applications,
        page,
        consts::APPLICATIONS_PAGE_SIZE,
    ))
}

/// Applications for pets owned by `owner_id`, optionally only those with
/// `status`, newest first.
///
/// Reads through a join; if that fails the owned pet ids are resolved first,
/// then their applications and pet summaries are fetched and merged.
pub async fn list_received_applications(
    repo: &repo::ImplAppRepo,
    owner_id: i64,
    status: Option<models::adoption::ApplicationStatus>,
    page: usize,
) -> AppResult<Page<models::adoption::ApplicationWithPet>> {
    let applications = match repo.get_received_applications(owner_id, status).await {
        Ok(applications) => applications,
        Err(err) => {
            tracing::warn!("received applications join failed, fetching in two steps: {err:#}");
            fetch_received_applications_in_two_steps(repo, owner_id, status).await?
        }
    };

    Ok(Page::from_items(
        applications,
        page,
        consts::APPLICATIONS_PAGE_SIZE,
    ))
}

async fn fetch_received_applications_in_two_steps(
    repo: &repo::ImplAppRepo,
    owner_id: i64,
    status: Option<models::adoption::ApplicationStatus>,
) -> AppResult<Vec<models::adoption::ApplicationWithPet>> {
    let pet_ids = repo.get_owned_pet_ids(owner_id).await?;
    if pet_ids.is_empty() {
        return Ok(Vec::new());
    }

    let applications = repo.get_applications_by_pet_ids(&pet_ids, status).await?;
    let pets: HashMap<i64, models::pet::PetSummary> = repo
        .get_pet_summaries_by_ids(&pet_ids)
        .await?
        .into_iter()
        .map(|pet| (pet.id, pet))
        .collect();

    Ok(applications
        .into_iter()
        .map(|application| models::adoption::ApplicationWithPet {
            pet: pets.get(&application.pet_id).cloned(),
            application,
        })
        .collect())
}

/// Contact fields used to pre-fill a new application form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationPrefill {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Contact details from the caller's most recent application, with the
/// account email when there is none.
pub async fn prefill_application(
    repo: &repo::ImplAppRepo,
    user: &models::user_app::User,
) -> AppResult<ApplicationPrefill> {
    let Some(latest) = repo.get_latest_user_application(user.id).await? else {
        return Ok(ApplicationPrefill {
            email: user.email.clone(),
            ..Default::default()
        });
    };

    Ok(ApplicationPrefill {
        full_name: latest.full_name,
        email: if latest.email.is_empty() {
            user.email.clone()
        } else {
            latest.email
        },
        phone: latest.phone,
        address: latest.address,
    })
}

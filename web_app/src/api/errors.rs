//! Errors returned by the adoption, favorites, pet and notification workflows.

use derive_more::{Display, Error};

const GENERIC_PERSISTENCE_MESSAGE: &str = "Please try again in a moment.";

#[derive(Debug, Display, Error, PartialEq)]
pub enum AppError {
    /// A field failed validation before anything was sent to the store
    #[display("{_0}")]
    Validation(#[error(not(source))] String),
    /// No session where one is required
    #[display("{_0}")]
    Auth(#[error(not(source))] String),
    /// Signed in, but not allowed to act on the resource
    #[display("{_0}")]
    Forbidden(#[error(not(source))] String),
    #[display("{_0}")]
    NotFound(#[error(not(source))] String),
    /// A previous application by the same applicant blocks the submission
    #[display("{_0}")]
    DuplicateApplication(#[error(not(source))] String),
    /// The store rejected a read or write
    #[display("{message}")]
    Persistence {
        code: Option<String>,
        message: String,
    },
}

impl AppError {
    /// Short heading used when the error is shown as a toast
    pub fn title(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Invalid input",
            AppError::Auth(_) => "Sign in required",
            AppError::Forbidden(_) => "Not allowed",
            AppError::NotFound(_) => "Not found",
            AppError::DuplicateApplication(_) => "Already applied",
            AppError::Persistence { .. } => "Error",
        }
    }

    /// Wraps a store failure, keeping the database error code when there is one.
    ///
    /// Not logged here, the web layer logs it once when rendering the response.
    pub fn persistence(err: anyhow::Error) -> Self {
        let code = err
            .downcast_ref::<sqlx::Error>()
            .and_then(|err| err.as_database_error())
            .and_then(|db_err| db_err.code())
            .map(|code| code.into_owned());

        let message = persistence_message(code.as_deref());

        AppError::Persistence { code, message }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::persistence(err)
    }
}

/// User facing text for a store error code.
///
/// SQLite reports extended result codes, Postgres reports SQLSTATE.
pub fn persistence_message(code: Option<&str>) -> String {
    match code {
        // foreign key violation
        Some("787" | "23503") => {
            "The selected pet could not be found. Please try selecting a different pet.".into()
        }
        // unique violation
        Some("2067" | "1555" | "23505") => {
            "You have already submitted an application for this pet.".into()
        }
        Some(code) => format!("Database error ({code}). Please contact support."),
        None => GENERIC_PERSISTENCE_MESSAGE.into(),
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{AppRepo, testing};

    #[test]
    fn test_persistence_message_known_codes() {
        assert_eq!(
            persistence_message(Some("787")),
            persistence_message(Some("23503"))
        );
        assert_eq!(
            persistence_message(Some("2067")),
            "You have already submitted an application for this pet."
        );
        assert_eq!(
            persistence_message(Some("5")),
            "Database error (5). Please contact support."
        );
        assert_eq!(persistence_message(None), GENERIC_PERSISTENCE_MESSAGE);
    }

    #[test]
    fn test_non_database_error_uses_generic_message() {
        let err = AppError::persistence(anyhow::anyhow!("connection reset"));

        assert_eq!(
            err,
            AppError::Persistence {
                code: None,
                message: GENERIC_PERSISTENCE_MESSAGE.to_string()
            }
        );
    }

    #[ntex::test]
    async fn test_foreign_key_violation_is_mapped() {
        let repo = testing::setup_test_repo().await;

        let err = repo
            .insert_adoption_application(&testing::application_fixture(
                404,
                None,
                "a@x.com",
                testing::minutes_ago(0),
            ))
            .await
            .map_err(AppError::from)
            .unwrap_err();

        assert_eq!(
            err,
            AppError::Persistence {
                code: Some("787".into()),
                message: persistence_message(Some("787"))
            }
        );
    }
}

//! Web responses for failures, rendered as toast JSON.

use crate::api::errors::AppError;
use derive_more::{Display, Error};
use log::error;
use ntex::{http, web};
use serde::Serialize;

/// Body every error response carries
#[derive(Debug, Serialize, PartialEq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: &'static str,
}

impl Toast {
    pub fn destructive(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            variant: "destructive",
        }
    }
}

fn toast_response(status: http::StatusCode, toast: &Toast) -> web::HttpResponse {
    web::HttpResponse::build(status).json(toast)
}

impl web::error::WebResponseError for AppError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{:?}", self);
        toast_response(
            self.status_code(),
            &Toast::destructive(self.title(), &self.to_string()),
        )
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            AppError::Validation(_) => http::StatusCode::BAD_REQUEST,
            AppError::Auth(_) => http::StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => http::StatusCode::FORBIDDEN,
            AppError::NotFound(_) => http::StatusCode::NOT_FOUND,
            AppError::DuplicateApplication(_) => http::StatusCode::CONFLICT,
            AppError::Persistence { .. } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum UserError {
    UrlNotFound,
    Unauthorized,
    FormInputValueError(#[error(not(source))] String),
}

impl web::error::WebResponseError for UserError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{:#?}", self);

        let toast = match self {
            UserError::UrlNotFound => Toast::destructive("Not found", "Resource not found"),
            UserError::Unauthorized => Toast::destructive("Not allowed", "Please sign in"),
            UserError::FormInputValueError(msg) => Toast::destructive("Invalid input", msg),
        };

        toast_response(self.status_code(), &toast)
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            UserError::UrlNotFound => http::StatusCode::NOT_FOUND,
            UserError::Unauthorized => http::StatusCode::UNAUTHORIZED,
            UserError::FormInputValueError(_) => http::StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum ServerError {
    ExternalServiceError(#[error(not(source))] String),
    InternalServerError(#[error(not(source))] String),
    InvalidCsrfToken,
}

impl ServerError {
    fn get_error_message(&self) -> String {
        match self {
            ServerError::ExternalServiceError(msg) => format!("[ExternalServiceError] {:#?}", msg),
            ServerError::InternalServerError(msg) => format!("[InternalServerError] {:#?}", msg),
            ServerError::InvalidCsrfToken => "[InvalidCsrfToken]".to_string(),
        }
    }
}

impl web::error::WebResponseError for ServerError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{}", self.get_error_message());

        let toast = match self {
            ServerError::InvalidCsrfToken => {
                Toast::destructive("Session expired", "Please reload the page and try again")
            }
            _ => Toast::destructive("Error", "Something went wrong, please try again later"),
        };

        toast_response(self.status_code(), &toast)
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            ServerError::InvalidCsrfToken => http::StatusCode::FORBIDDEN,
            _ => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

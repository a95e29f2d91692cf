//! Handlers not linked to a specific resource

use ntex::web;
use serde::Deserialize;
use serde_json::json;

use crate::{
    consts,
    front::{errors, middleware, oauth},
};

/// Return a [UrlNotFound](errors::UserError::UrlNotFound) error for urls not defined
pub async fn serve_not_found() -> Result<web::HttpResponse, web::Error> {
    Err(errors::UserError::UrlNotFound.into())
}

#[derive(Deserialize, Debug, Default)]
pub struct IndexQuery {
    /// Local path to land on after signing in
    pub redirect_to: Option<String>,
}

/// Only same-site absolute paths are followed after login
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains("://")
}

/// Entry point: the google login url, and the caller when already signed in
#[web::get("/")]
async fn index(
    logged_user: middleware::logged_user::MaybeLoggedUser,
    query: web::types::Query<IndexQuery>,
    cookie: ntex_session::Session,
) -> Result<impl web::Responder, web::Error> {
    if let Some(redirect_to) = query.redirect_to.as_deref().filter(|p| is_local_path(p)) {
        cookie.set(consts::REDIRECT_TO_COOKIE_NAME, redirect_to)?;
    }

    let (auth_url, csrf_state) = oauth::get_new_auth_url();

    cookie
        .set(consts::CSRF_STATE_COOKIE_NAME, csrf_state)
        .map_err(|e| {
            errors::ServerError::InternalServerError(format!(
                "at index cant set CSRF_STATE_COOKIE_NAME: {e}"
            ))
        })?;

    Ok(web::HttpResponse::Ok().json(&json!({
        "google_oauth_auth_url": auth_url.to_string(),
        "user": logged_user.0,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_local_path() {
        assert!(is_local_path("/applications/received"));
        assert!(!is_local_path("//evil.example.com"));
        assert!(!is_local_path("https://evil.example.com"));
        assert!(!is_local_path("dashboard"));
    }
}

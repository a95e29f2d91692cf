use ntex::web;
use serde::Deserialize;

use crate::{
    api,
    front::{AppState, errors, middleware, utils},
    models,
};

#[derive(Deserialize, Debug)]
pub struct ReceivedQuery {
    pub page: Option<usize>,
    pub status: Option<String>,
}

impl ReceivedQuery {
    /// `None` for a missing, empty or `all` status
    fn status(&self) -> Result<Option<models::adoption::ApplicationStatus>, errors::UserError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(status) => status
                .parse::<models::adoption::ApplicationStatus>()
                .map(Some)
                .map_err(errors::UserError::FormInputValueError),
        }
    }
}

#[web::get("/mine")]
async fn list_mine(
    logged_user: models::user_app::User,
    query: web::types::Query<utils::PageQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let page =
        api::adoption::list_my_applications(&app_state.repo, logged_user.id, query.page()).await?;

    Ok(web::HttpResponse::Ok().json(&page))
}

#[web::get("/received")]
async fn list_received(
    logged_user: models::user_app::User,
    query: web::types::Query<ReceivedQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let page = api::adoption::list_received_applications(
        &app_state.repo,
        logged_user.id,
        query.status()?,
        query.page.unwrap_or(1).max(1),
    )
    .await?;

    Ok(web::HttpResponse::Ok().json(&page))
}

#[web::post("/{application_id}/accept")]
async fn accept(
    _: middleware::csrf_token::CsrfToken,
    logged_user: models::user_app::User,
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let summary = api::adoption::accept_application(
        &app_state.repo,
        &app_state.notification_hub,
        logged_user.id,
        path.into_inner(),
    )
    .await?;

    Ok(web::HttpResponse::Ok().json(&summary))
}

#[web::post("/{application_id}/reject")]
async fn reject(
    _: middleware::csrf_token::CsrfToken,
    logged_user: models::user_app::User,
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    api::adoption::reject_application(
        &app_state.repo,
        &app_state.notification_hub,
        app_state.workflow,
        logged_user.id,
        path.into_inner(),
    )
    .await?;

    Ok(web::HttpResponse::NoContent().finish())
}

/// Withdraws one of the caller's pending applications
#[web::delete("/{application_id}")]
async fn cancel(
    _: middleware::csrf_token::CsrfToken,
    logged_user: models::user_app::User,
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    api::adoption::cancel_application(&app_state.repo, logged_user.id, path.into_inner()).await?;

    Ok(web::HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(status: Option<&str>) -> ReceivedQuery {
        ReceivedQuery {
            page: None,
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_received_query_status() {
        assert_eq!(query(None).status().unwrap(), None);
        assert_eq!(query(Some("all")).status().unwrap(), None);
        assert_eq!(
            query(Some("pending")).status().unwrap(),
            Some(models::adoption::ApplicationStatus::Pending)
        );
        assert!(query(Some("archived")).status().is_err());
    }
}

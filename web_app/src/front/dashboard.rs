use ntex::web;
use serde::Serialize;

use crate::{api, front::AppState, models};

/// Everything the signed in user sees on their dashboard
#[derive(Serialize, Debug)]
pub struct Dashboard {
    pub user: models::user_app::User,
    pub applications: api::adoption::Page<models::adoption::ApplicationWithPet>,
    pub favorites: Vec<models::favorite::FavoriteWithPet>,
    pub notifications: api::notification::NotificationInbox,
}

/// Loads the dashboard sections of `user`; the first failing section fails the whole.
pub async fn load_dashboard(
    app_state: &AppState,
    user: models::user_app::User,
) -> api::errors::AppResult<Dashboard> {
    let _span = logfire::span!("load_dashboard").entered();

    let (applications, favorites, notifications) = futures::try_join!(
        api::adoption::list_my_applications(&app_state.repo, user.id, 1),
        api::favorite::list_favorites(&app_state.repo, user.id),
        api::notification::load_inbox(&app_state.repo, user.id),
    )?;

    Ok(Dashboard {
        user,
        applications,
        favorites,
        notifications,
    })
}

#[web::get("/dashboard")]
async fn get_dashboard(
    logged_user: models::user_app::User,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let dashboard = load_dashboard(&app_state, logged_user).await?;

    Ok(web::HttpResponse::Ok().json(&dashboard))
}

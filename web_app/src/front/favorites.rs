use ntex::web;
use serde_json::json;

use crate::{
    api,
    front::{AppState, middleware},
    models,
};

#[web::get("")]
async fn list_favorites(
    logged_user: models::user_app::User,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let favorites = api::favorite::list_favorites(&app_state.repo, logged_user.id).await?;

    Ok(web::HttpResponse::Ok().json(&favorites))
}

#[web::get("/{pet_id}")]
async fn is_favorited(
    logged_user: models::user_app::User,
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let pet_id = path.into_inner();
    let liked = api::favorite::is_favorited(&app_state.repo, logged_user.id, pet_id).await?;

    Ok(web::HttpResponse::Ok().json(&json!({ "pet_id": pet_id, "liked": liked })))
}

#[web::put("/{pet_id}")]
async fn add_favorite(
    _: middleware::csrf_token::CsrfToken,
    logged_user: models::user_app::User,
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    api::favorite::add_favorite(&app_state.repo, logged_user.id, path.into_inner()).await?;

    Ok(web::HttpResponse::NoContent().finish())
}

#[web::delete("/{pet_id}")]
async fn remove_favorite(
    _: middleware::csrf_token::CsrfToken,
    logged_user: models::user_app::User,
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    api::favorite::remove_favorite(&app_state.repo, logged_user.id, path.into_inner()).await?;

    Ok(web::HttpResponse::NoContent().finish())
}

/// Flips the liked state and returns the state that was persisted
#[web::post("/{pet_id}/toggle")]
async fn toggle_favorite(
    _: middleware::csrf_token::CsrfToken,
    logged_user: models::user_app::User,
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let pet_id = path.into_inner();
    let mut view = api::favorite::load_favorites_view(&app_state.repo, logged_user.id).await?;
    let liked =
        api::favorite::toggle_favorite(&app_state.repo, &mut view, logged_user.id, pet_id).await?;

    Ok(web::HttpResponse::Ok().json(&json!({ "pet_id": pet_id, "liked": liked })))
}

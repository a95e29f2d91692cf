use ntex::web;

use crate::{
    api,
    front::{AppState, middleware},
    models,
};

/// Contact details of the caller's latest application, empty when none
#[web::get("/prefill")]
async fn get_prefill(
    logged_user: models::user_app::User,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let prefill = api::adoption::prefill_application(&app_state.repo, &logged_user).await?;

    Ok(web::HttpResponse::Ok().json(&prefill))
}

#[web::post("/{slug}")]
async fn submit_application(
    _: middleware::csrf_token::CsrfToken,
    logged_user: models::user_app::User,
    path: web::types::Path<String>,
    form: web::types::Json<api::adoption::ApplicationForm>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let application = api::adoption::submit_application(
        &app_state.repo,
        Some(logged_user.id),
        &path,
        form.into_inner(),
    )
    .await?;

    Ok(web::HttpResponse::Created().json(&application))
}

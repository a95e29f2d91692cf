use ntex::web;
use ntex_identity::Identity;
use oauth2::{AuthorizationCode, CsrfToken, TokenResponse, reqwest};
use serde::Deserialize;

use crate::{
    api, consts,
    front::{AppState, errors, middleware, oauth, session, utils},
    metric,
};

/// Google oauth minimum data to handle the login callback request
#[derive(Deserialize, Debug)]
struct Q {
    code: String,
    state: String,
}

/// Profile fields read from the google user info endpoint
#[derive(Deserialize, Clone, Debug)]
pub struct UserProfile {
    email: String,
}

async fn exchange_code_for_email(code: &str) -> Result<String, errors::ServerError> {
    let http_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(1))
        .build()
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("at google oauth client: {e}"))
        })?;

    let token = oauth::GOOGLE_OAUTH
        .exchange_code(AuthorizationCode::new(code.to_string()))
        .request_async(&http_client)
        .await
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!(
                "at google oauth token creation: {e}"
            ))
        })?
        .access_token()
        .secret()
        .to_string();

    let profile = crate::utils::REQUEST_CLIENT
        .get(consts::GOOGLE_ENDPOINT_USER_INFO)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("at get google user info: {e}"))
        })?
        .json::<UserProfile>()
        .await
        .map_err(|e| {
            errors::ServerError::ExternalServiceError(format!("at get google user info: {e}"))
        })?;

    Ok(profile.email)
}

/// Endpoint handles the google oauth callback login from index login
#[web::get("/google_callback")]
async fn google_callback(
    q: web::types::Query<Q>,
    cookie: ntex_session::Session,
    app_state: web::types::State<AppState>,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    if q.state.ne(cookie
        .get::<CsrfToken>(consts::CSRF_STATE_COOKIE_NAME)?
        .unwrap_or(CsrfToken::new_random())
        .secret())
    {
        cookie.clear();
        return Err(errors::ServerError::InternalServerError(
            "at google_callback the oauth state does not match".into(),
        )
        .into());
    }
    cookie.remove(consts::CSRF_STATE_COOKIE_NAME);

    let email = exchange_code_for_email(&q.code).await?;

    middleware::csrf_token::issue_csrf_token(&app_state.csrf_protec, &cookie)?;

    let user = api::user::get_or_create_app_user_by_email(&app_state.repo, &email)
        .await
        .map_err(|e| {
            errors::ServerError::InternalServerError(format!(
                "at /google_callback user could not be retrieved: {e}"
            ))
        })?;

    if !user.is_enabled {
        cookie.clear();
        return Err(errors::UserError::Unauthorized.into());
    }

    identity.remember(serde_json::to_string(&session::WebAppSession { user })?);
    metric::incr_user_action_statds("login");

    if let Ok(Some(redirect_to)) = cookie.get::<String>(consts::REDIRECT_TO_COOKIE_NAME) {
        cookie.remove(consts::REDIRECT_TO_COOKIE_NAME);
        return utils::redirect_to(&redirect_to);
    }

    utils::redirect_to("/dashboard")
}

/// Forgets the identity and the session cookies
#[web::post("/logout")]
async fn logout(
    _: middleware::csrf_token::CsrfToken,
    _: session::WebAppSession,
    identity: Identity,
    cookie: ntex_session::Session,
) -> Result<impl web::Responder, web::Error> {
    identity.forget();
    cookie.clear();
    metric::incr_user_action_statds("logout");

    utils::redirect_to("/")
}

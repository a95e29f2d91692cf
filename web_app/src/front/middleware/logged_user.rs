use ntex::{
    http::Payload,
    web::{Error, FromRequest, HttpRequest},
};
use ntex_identity::RequestIdentity;

use crate::{api::errors::AppError, front::session::WebAppSession, models};

/// Caller of a public endpoint, signed in or not
pub struct MaybeLoggedUser(pub Option<models::user_app::User>);

impl MaybeLoggedUser {
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|user| user.id)
    }
}

/// Extracts the signed in [User](models::user_app::User) from the identity cookie
fn get_logged_user(identity_cookie: Option<String>) -> Option<models::user_app::User> {
    WebAppSession::from_identity(identity_cookie)
        .map(|session| session.user)
        .filter(|user| user.is_enabled)
}

impl<Err> FromRequest<Err> for models::user_app::User {
    type Error = Error;

    fn from_request(
        req: &HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        futures::future::ready(
            get_logged_user(req.get_identity())
                .ok_or_else(|| Error::from(AppError::Auth("Please sign in".into()))),
        )
    }
}

impl<Err> FromRequest<Err> for MaybeLoggedUser {
    type Error = Error;

    fn from_request(
        req: &HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        futures::future::ready(Ok(Self(get_logged_user(req.get_identity()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_for(user: models::user_app::User) -> Option<String> {
        serde_json::to_string(&WebAppSession { user }).ok()
    }

    #[test]
    fn test_get_logged_user() {
        let mut user = models::user_app::User::create_default_from_email("ana@example.com");
        user.id = 7;

        assert_eq!(get_logged_user(identity_for(user.clone())), Some(user));
        assert_eq!(get_logged_user(None), None);
    }

    #[test]
    fn test_disabled_user_is_not_logged() {
        let mut user = models::user_app::User::create_default_from_email("ana@example.com");
        user.is_enabled = false;

        assert_eq!(get_logged_user(identity_for(user)), None);
    }
}

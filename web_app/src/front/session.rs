use ntex::{
    http::Payload,
    web::{Error, FromRequest, HttpRequest},
};
use ntex_identity::RequestIdentity;

use crate::{front::errors, models};

/// Cookie session data stored (encrypt) on user side
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct WebAppSession {
    pub user: models::user_app::User,
}

impl WebAppSession {
    /// Parses the identity cookie value, `None` when missing or malformed
    pub fn from_identity(identity_cookie: Option<String>) -> Option<Self> {
        serde_json::from_str::<Self>(&identity_cookie?).ok()
    }
}

impl<Err> FromRequest<Err> for WebAppSession {
    type Error = Error;

    fn from_request(
        req: &HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        futures::future::ready(
            Self::from_identity(req.get_identity())
                .ok_or_else(|| Error::from(errors::UserError::Unauthorized)),
        )
    }
}

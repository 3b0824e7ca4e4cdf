//! Session management.
//!
//! Authentication itself happens at an external entry point (CAS); by the
//! time a request reaches this server the caller's identity and role travel
//! in a sealed cookie. A missing or damaged cookie simply makes the request
//! anonymous — handlers decide what anonymity means for them.

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use failure::Fail;
use futures::future::{self, FutureResult};
use plinth_error::{ApiError, Error};
use plinth_models::User;
use plinth_util::{SealingError, seal, unseal};

use crate::extractors::Secret;

/// Name of the cookie carrying the sealed session.
pub const COOKIE: &str = "sesid";

/// Session extractor.
///
/// Extract session data from a request or reject it. Requests are rejected
/// when the session cookie is missing or damaged; handlers that accept
/// anonymous callers should extract `Option<Session>` instead.
pub struct Session {
    user: User,
}

impl Session {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn into_user(self) -> User {
        self.user
    }

    /// Produce the sealed cookie value for a user.
    ///
    /// Used by the authentication callback, and by tests standing in
    /// for it.
    pub fn cookie(secret: &[u8], user: &User)
    -> Result<String, SealingError> {
        seal(secret, user).map(|sealed| base64::encode(&sealed))
    }
}

impl FromRequest for Session {
    type Error = Error;
    type Future = FutureResult<Session, Error>;
    type Config = ();

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let secret = match req.app_data::<Secret>() {
            Some(secret) => secret,
            None => return future::err(SessionSecretMissing.into()),
        };

        let cookie = match req.cookie(COOKIE) {
            Some(cookie) => cookie,
            None => return future::err(SessionRequired.into()),
        };

        let mut data = match base64::decode(cookie.value()) {
            Ok(data) => data,
            Err(_) => return future::err(SessionRequired.into()),
        };

        match unseal::<User>(&secret, &mut data) {
            Ok(user) => future::ok(Session { user }),
            Err(err) => {
                log::debug!("rejecting session cookie: {}", err);
                future::err(SessionRequired.into())
            }
        }
    }
}

/// The request carried no usable session.
#[derive(ApiError, Debug, Fail)]
#[api(code = "user:session:required", status = "UNAUTHORIZED")]
#[fail(display = "a session is required to access this resource")]
pub struct SessionRequired;

/// Error returned when the sealing secret has not been configured.
#[derive(ApiError, Debug, Fail)]
#[api(internal)]
#[fail(display = "session secret (Secret) needs to be set for Session \
    extraction to work")]
pub struct SessionSecretMissing;

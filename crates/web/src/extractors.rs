use actix_web::{FromRequest, HttpRequest, dev::Payload};
use failure::Fail;
use futures::future::{self, FutureResult};
use plinth_error::{ApiError, Error};
use plinth_models::{Protocol, SharedIndex};
use std::ops::Deref;

/// Extract a search-index handle for a request.
pub struct Search(SharedIndex);

impl FromRequest for Search {
    type Error = Error;
    type Future = FutureResult<Search, Error>;
    type Config = ();

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.app_data::<SharedIndex>() {
            Some(index) => future::ok(Search(index.clone())),
            None => future::err(SearchIndexMissing.into()),
        }
    }
}

impl Deref for Search {
    type Target = dyn plinth_models::Index;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

/// Error returned by [`Search`]'s implementation of [`FromRequest`] when the
/// index handle has not been configured.
#[derive(ApiError, Debug, Fail)]
#[api(internal)]
#[fail(display = "search index handle needs to be set for Search extraction \
    to work")]
pub struct SearchIndexMissing;

/// The protocol the client used, as seen by the connection.
///
/// URLs embedded in generated documents follow it, so manifests requested
/// over SSL link back over SSL.
pub struct RequestProtocol(pub Protocol);

impl FromRequest for RequestProtocol {
    type Error = Error;
    type Future = FutureResult<RequestProtocol, Error>;
    type Config = ();

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let ssl = req.connection_info().scheme() == "https";
        future::ok(RequestProtocol(Protocol::from_ssl(ssl)))
    }
}

/// Value of the secret key from a request.
pub struct Secret {
    secret: Box<[u8]>,
}

impl Secret {
    /// Construct a new secret.
    pub fn new(secret: &[u8]) -> Self {
        Secret {
            secret: secret.to_vec().into_boxed_slice(),
        }
    }
}

impl Deref for Secret {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.secret
    }
}

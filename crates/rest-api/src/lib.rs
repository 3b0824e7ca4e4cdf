//! Plinth's REST API.

use actix_web::web::ServiceConfig;
use serde::Deserialize;

mod collections;
mod concerns;

pub type Result<T, E=plinth_error::Error> = std::result::Result<T, E>;

/// API configuration, registered as application data.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// External authentication entry point. Unauthenticated callers denied
    /// an action are sent here, with the original URL remembered for their
    /// return.
    pub login_url: String,
}

/// Configure an [`actix_web::App`] for an API server.
pub fn configure(cfg: &mut ServiceConfig) {
    collections::configure(cfg);
    concerns::configure(cfg);
}

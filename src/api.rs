//! The HTTP server.

use actix_web::{App, HttpServer, middleware};
use plinth_models::{MemoryIndex, SharedIndex};
use plinth_web::Secret;
use std::sync::Arc;

use crate::{Result, config::Config};

/// Start an API server.
pub fn start(config: &'static Config) -> Result<()> {
    let index: SharedIndex = match config.index.snapshot {
        Some(ref path) => Arc::new(MemoryIndex::load(path)?),
        None => Arc::new(MemoryIndex::new()),
    };

    let api = plinth_rest_api::Config {
        login_url: config.server.login_url.clone(),
    };

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .data(index.clone())
            .data(Secret::new(&config.server.secret))
            .data(api.clone())
            .configure(plinth_rest_api::configure)
    });

    server
        .bind(config.server.address)?
        .run()?;

    Ok(())
}

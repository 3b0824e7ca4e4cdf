//! Server administration.

use crate::{Result, api, config::Config};

pub fn start(config: &'static Config) -> Result<()> {
    api::start(config)?;

    Ok(())
}

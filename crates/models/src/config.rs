use plinth_util::SingleInit;
use serde::Deserialize;
use std::path::PathBuf;

static CONFIG: SingleInit<&'static Config> = SingleInit::uninit();

static DOMAIN: SingleInit<String> = SingleInit::uninit();

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
}

/// Search index configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct IndexConfig {
    /// Path to a JSON snapshot to preload into the in-memory index.
    pub snapshot: Option<PathBuf>,
}

impl Config {
    /// Get global configuration.
    ///
    /// ## Panics
    ///
    /// This function will panic if called before [`Config::register`].
    pub fn global() -> &'static Config {
        CONFIG.get().expect("model configuration must be initialized before \
            calling Config::global")
    }

    /// Get configured domain.
    ///
    /// ## Panics
    ///
    /// This function will panic if called before [`Config::register`].
    pub fn domain() -> &'static str {
        DOMAIN.get().expect("model configuration must be initialized before \
            calling Config::domain")
    }

    /// Get configured domain, or `None` if configuration has not been
    /// registered yet.
    pub fn try_domain() -> Option<&'static str> {
        DOMAIN.get().map(String::as_str)
    }

    /// Register this configuration as the global static configuration
    /// ([`Config::global`]).
    pub fn register(&'static self, domain: &str) {
        CONFIG.get_or_init(|| self);
        DOMAIN.get_or_init(|| domain.to_string());
    }
}

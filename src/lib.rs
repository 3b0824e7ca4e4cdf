pub use self::cli::main;

pub mod api;
pub mod cli;
pub mod config;

pub type Result<T, E=failure::Error> = std::result::Result<T, E>;

mod config;
mod protocol;

pub mod index;
pub mod models;
pub mod permissions;

pub use self::{
    config::{Config, IndexConfig},
    index::{FindResourceError, Index, MemoryIndex, SharedIndex},
    models::*,
    permissions::{Ability, AccessDeniedError, Action, ActionBits, Role, User},
    protocol::Protocol,
};

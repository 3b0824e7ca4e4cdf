mod extractors;

pub mod session;

pub use self::{
    extractors::{RequestProtocol, Search, Secret},
    session::Session,
};

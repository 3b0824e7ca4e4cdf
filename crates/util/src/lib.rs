mod seal;
mod single_init;

pub use self::{
    seal::*,
    single_init::SingleInit,
};

//! Session credential and its storage contract

mod store;
mod token;

pub use store::TokenStore;
pub use token::SessionToken;

//! Traits injected into the client by the embedding application

mod navigator;

pub use navigator::{HeadlessNavigator, Navigator};

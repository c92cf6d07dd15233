//! Integration test utilities for the LexiLearn client
//!
//! Runs the client against an in-process fake backend that issues real
//! JWTs, can expire them on demand, and counts every refresh.

pub mod backend;
pub mod fixtures;
pub mod helpers;

pub use backend::{FakeBackend, TestServer, UNVERIFIED_EMAIL, VALID_OTP, VALID_PASSWORD};
pub use fixtures::*;
pub use helpers::*;

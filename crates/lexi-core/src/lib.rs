//! # lexi-core
//!
//! Domain layer for the LexiLearn API client: the session credential, the
//! backend response envelope, auth DTOs, and the storage/navigation traits.
//! This crate has no dependency on the HTTP transport.

pub mod dto;
pub mod error;
pub mod session;
pub mod traits;

// Re-export commonly used types at crate root
pub use dto::{
    ApiEnvelope, AuthData, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResendOtpRequest, ResetPasswordRequest, TokenData, VerifyOtpRequest,
};
pub use error::{DomainError, DomainResult};
pub use session::{SessionToken, TokenStore};
pub use traits::{HeadlessNavigator, Navigator};

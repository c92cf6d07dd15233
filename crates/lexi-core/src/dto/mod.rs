//! Data transfer objects exchanged with the LexiLearn backend

mod auth;
mod envelope;

pub use auth::{
    AuthData, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResendOtpRequest,
    ResetPasswordRequest, TokenData, VerifyOtpRequest,
};
pub use envelope::ApiEnvelope;

//! Auth request and response DTOs
//!
//! Requests implement `Validate` so obviously malformed input is rejected
//! before it reaches the network. Field names follow the backend's
//! camelCase JSON.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;
use crate::session::SessionToken;

// ============================================================================
// Auth Requests
// ============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Account registration request
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 64, message = "Name must be 2-64 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    /// `student` or `teacher`; the backend assigns a default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// One-time password verification completing registration
#[derive(Debug, Clone, Serialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 4, max = 8, message = "OTP must be 4-8 characters"))]
    pub otp: String,
}

/// Ask the backend to send a fresh one-time password
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ResendOtpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Start the password reset flow
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Complete the password reset flow with the emailed reset token
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub new_password: String,
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Payload of a token-issuing endpoint (login, verify-otp)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthData {
    #[serde(default, alias = "accessToken", alias = "access_token")]
    pub token: Option<String>,

    /// Backend user record, opaque to the client
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

impl AuthData {
    /// Extract the session token, if the payload carries one
    pub fn session_token(&self) -> Result<Option<SessionToken>, DomainError> {
        self.token.as_deref().map(SessionToken::new).transpose()
    }
}

/// Payload of the refresh endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenData {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
}

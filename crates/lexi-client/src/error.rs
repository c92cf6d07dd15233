//! Client error types
//!
//! Only an expired-token 401 is recovered locally. Every other failure is
//! surfaced to the caller as one of these variants.

use std::fmt;

use lexi_common::ConfigError;
use lexi_core::DomainError;

/// Error returned by every client operation
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network unreachable, timeout, or a body that could not be read
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response, including a 401 that was not recoverable
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    /// The session refresh failed; the session has been torn down
    #[error("Session refresh failed: {0}")]
    Refresh(#[from] RefreshError),

    /// 2xx response whose envelope reported `success: false`
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// HTTP status carried by this error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Refresh(e) => e.status,
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend denied the request as unauthenticated
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Whether the session has ended and the user must log in again
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Refresh(_))
    }

    /// Message suitable for showing to the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Rejected { message } => message.clone(),
            Self::Refresh(_) => "Your session has expired. Please log in again.".to_string(),
            Self::Transport(_) => "Unable to reach the server. Please try again.".to_string(),
            other => other.to_string(),
        }
    }

    /// Get error code for diagnostics
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Status { .. } => "HTTP_ERROR",
            Self::Refresh(_) => "SESSION_EXPIRED",
            Self::Rejected { .. } => "REJECTED",
            Self::Decode(_) => "DECODE_ERROR",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Domain(e) => e.code(),
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    pub(crate) fn invalid_request(msg: impl fmt::Display) -> Self {
        Self::InvalidRequest(msg.to_string())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Domain(DomainError::from(err))
    }
}

/// Why a refresh failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshErrorKind {
    /// The refresh call never produced a response
    Transport,
    /// The backend refused to issue a new token
    Rejected,
    /// The new token could not be persisted
    Storage,
    /// The task running the refresh was cancelled before it finished
    Abandoned,
}

/// Outcome shared by every caller parked on a failed refresh.
///
/// Cloned to each waiter, so all of them observe the same error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RefreshError {
    pub kind: RefreshErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl RefreshError {
    pub fn transport(err: &reqwest::Error) -> Self {
        Self {
            kind: RefreshErrorKind::Transport,
            status: None,
            message: format!("refresh request failed: {err}"),
        }
    }

    pub fn rejected(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind: RefreshErrorKind::Rejected,
            status,
            message: message.into(),
        }
    }

    pub fn storage(err: &DomainError) -> Self {
        Self {
            kind: RefreshErrorKind::Storage,
            status: None,
            message: format!("could not persist refreshed token: {err}"),
        }
    }

    pub fn abandoned() -> Self {
        Self {
            kind: RefreshErrorKind::Abandoned,
            status: None,
            message: "refresh was cancelled before completing".to_string(),
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

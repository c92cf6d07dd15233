//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Session Errors
    // =========================================================================
    #[error("Session token is empty")]
    EmptyToken,

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Token storage is corrupted: {0}")]
    CorruptedStorage(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),
}

impl DomainError {
    /// Check if this is a storage error
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::CorruptedStorage(_))
    }

    /// Check if this is a validation error
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyToken | Self::Validation(_) | Self::InvalidRoute(_)
        )
    }

    /// Get error code for diagnostics
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyToken => "EMPTY_TOKEN",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::CorruptedStorage(_) => "CORRUPTED_STORAGE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidRoute(_) => "INVALID_ROUTE",
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

//! Token storage contract
//!
//! A store holds at most one session token. Writes happen only on the
//! login, verification, refresh and logout paths; every outgoing request
//! reads it.

use crate::error::DomainResult;

use super::SessionToken;

/// Persistent storage for the current session token.
///
/// Implementations must be safe to share between tasks; the HTTP client
/// holds them behind an `Arc`.
pub trait TokenStore: Send + Sync {
    /// Read the stored token, `None` when no session exists
    fn load(&self) -> DomainResult<Option<SessionToken>>;

    /// Store a token, overwriting any previous one
    fn save(&self, token: &SessionToken) -> DomainResult<()>;

    /// Remove the stored token. Succeeds when nothing is stored.
    fn clear(&self) -> DomainResult<()>;

    /// Whether a token is currently stored
    fn has_token(&self) -> DomainResult<bool> {
        Ok(self.load()?.is_some())
    }
}

//! In-memory token store
//!
//! Does not persist across restarts. Used for tests, short-lived scripts,
//! and as the default when no token file is configured.

use parking_lot::RwLock;

use lexi_core::{DomainResult, SessionToken, TokenStore};

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SessionToken>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token
    #[must_use]
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> DomainResult<Option<SessionToken>> {
        Ok(self.token.read().clone())
    }

    fn save(&self, token: &SessionToken) -> DomainResult<()> {
        *self.token.write() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> DomainResult<()> {
        *self.token.write() = None;
        Ok(())
    }
}

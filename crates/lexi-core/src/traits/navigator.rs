//! Navigation hooks used by the session-recovery path
//!
//! The client never inspects a global location. Whether the user is on an
//! unauthenticated landing route, and what a "return to the public route"
//! means, is supplied by the embedding application.

/// Route awareness required by unauthorized-response recovery
pub trait Navigator: Send + Sync {
    /// True when the current route is an unauthenticated landing route.
    ///
    /// Recovery is skipped on public routes and no redirect is issued.
    fn is_on_public_route(&self) -> bool;

    /// Navigate to the public route once the session has ended
    fn redirect_to_public(&self);
}

/// Navigator for headless callers (services, scripts, tests).
///
/// Never reports a public route, so recovery always applies, and ignores
/// redirects.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessNavigator;

impl Navigator for HeadlessNavigator {
    fn is_on_public_route(&self) -> bool {
        false
    }

    fn redirect_to_public(&self) {}
}

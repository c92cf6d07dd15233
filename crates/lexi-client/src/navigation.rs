//! Route tracking for applications embedding the client
//!
//! `RouteTracker` is the default `Navigator`: the embedding application
//! reports route changes through `navigate_to`, and the client asks it
//! whether the current route is public and tells it to return to `/` when
//! the session ends.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use tracing::info;

use lexi_common::{normalize_route, SessionConfig};
use lexi_core::{DomainError, DomainResult, Navigator};

/// Route the client returns to when the session ends
pub const PUBLIC_ROUTE: &str = "/";

#[derive(Debug)]
pub struct RouteTracker {
    current: RwLock<String>,
    public_routes: Vec<String>,
    redirects: AtomicUsize,
}

impl RouteTracker {
    /// Tracker starting at `/` with the given public routes
    pub fn new<I, S>(public_routes: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let public_routes = public_routes
            .into_iter()
            .map(|r| normalize(r.as_ref()))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Self {
            current: RwLock::new(PUBLIC_ROUTE.to_string()),
            public_routes,
            redirects: AtomicUsize::new(0),
        })
    }

    /// Tracker using the configured public routes
    pub fn from_config(config: &SessionConfig) -> DomainResult<Self> {
        Self::new(&config.public_routes)
    }

    /// Record that the application moved to `route`
    pub fn navigate_to(&self, route: &str) -> DomainResult<()> {
        *self.current.write() = normalize(route)?;
        Ok(())
    }

    #[must_use]
    pub fn current_route(&self) -> String {
        self.current.read().clone()
    }

    /// How many times the session teardown redirected to the public route
    #[must_use]
    pub fn redirect_count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn public_routes(&self) -> &[String] {
        &self.public_routes
    }
}

fn normalize(route: &str) -> DomainResult<String> {
    normalize_route(route).map_err(|e| DomainError::InvalidRoute(e.to_string()))
}

impl Navigator for RouteTracker {
    fn is_on_public_route(&self) -> bool {
        let current = self.current.read();
        self.public_routes.iter().any(|r| *r == *current)
    }

    fn redirect_to_public(&self) {
        let mut current = self.current.write();
        info!(from = %*current, "Session ended, returning to public route");
        *current = PUBLIC_ROUTE.to_string();
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

//! Test helpers for integration tests
//!
//! Instrumented token store, route helpers, and tracing setup.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use lexi_client::{MemoryTokenStore, RouteTracker};
use lexi_common::{init_tracing, TracingConfig};
use lexi_core::{DomainError, DomainResult, SessionToken, TokenStore};

/// Route a signed-in user is on when most tests fire their requests
pub const PRIVATE_ROUTE: &str = "/student/dashboard";

/// Install the test subscriber once per test binary
pub fn init_test_tracing() {
    // Each test calls this; only the first install wins
    let _ = init_tracing(&TracingConfig::test());
}

/// Route tracker with the default public routes, already on a private route
pub fn tracker_on_private_route() -> Arc<RouteTracker> {
    let tracker = RouteTracker::new(["/", "/login"]).expect("valid routes");
    tracker.navigate_to(PRIVATE_ROUTE).expect("valid route");
    Arc::new(tracker)
}

/// In-memory store that counts writes and can be told to fail saves
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryTokenStore,
    saves: AtomicUsize,
    clears: AtomicUsize,
    fail_saves: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl TokenStore for CountingStore {
    fn load(&self) -> DomainResult<Option<SessionToken>> {
        self.inner.load()
    }

    fn save(&self, token: &SessionToken) -> DomainResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::Storage("disk full".to_string()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(token)
    }

    fn clear(&self) -> DomainResult<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

//! Single-flight session refresh
//!
//! The first caller to need a refresh becomes the leader and runs it. Any
//! caller arriving while that refresh is outstanding parks a oneshot sender
//! in the waiter list and receives the leader's outcome instead of starting
//! its own refresh.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;

use lexi_core::SessionToken;

use crate::error::RefreshError;

/// Result delivered to every caller of a refresh
pub type RefreshOutcome = Result<SessionToken, RefreshError>;

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Coalesces concurrent refresh requests into one refresh call.
///
/// The lock is never held across an await point.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
    refreshes: AtomicU64,
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh is currently outstanding
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Number of refreshes started by this coordinator
    #[must_use]
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// Number of callers currently parked on the outstanding refresh
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Run `refresh` unless one is already outstanding, in which case wait
    /// for that one's outcome.
    ///
    /// `refresh` is only invoked by the leader. It should finish all of its
    /// side effects (persisting or clearing the token) before resolving:
    /// waiters are released only after it returns and the in-flight flag is
    /// cleared.
    pub async fn run<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        self.run_if_stale(None, || None, refresh).await
    }

    /// Like [`run`](Self::run), but skip the refresh when the session has
    /// already moved past the `rejected` token.
    ///
    /// `current` reads the stored token. It is called under the state lock
    /// and only when no refresh is outstanding; since a leader persists its
    /// token before releasing the lock, a caller whose 401 arrives just
    /// after a refresh completed gets that refresh's token instead of
    /// starting another.
    pub async fn run_if_stale<C, F, Fut>(
        &self,
        rejected: Option<&SessionToken>,
        current: C,
        refresh: F,
    ) -> RefreshOutcome
    where
        C: FnOnce() -> Option<SessionToken>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        let parked = {
            let mut state = self.state.lock();
            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.waiters.push(tx);
                Some(rx)
            } else {
                if let Some(stored) = current() {
                    if rejected != Some(&stored) {
                        debug!("Session already refreshed, reusing stored token");
                        return Ok(stored);
                    }
                }
                state.in_flight = true;
                None
            }
        };

        if let Some(rx) = parked {
            debug!("Refresh already in flight, waiting for its outcome");
            return rx.await.unwrap_or_else(|_| Err(RefreshError::abandoned()));
        }

        self.refreshes.fetch_add(1, Ordering::SeqCst);
        let guard = LeaderGuard {
            coordinator: self,
            finished: false,
        };

        let outcome = refresh().await;
        guard.finish(&outcome);
        outcome
    }

    /// Clear the in-flight flag and hand the outcome to every waiter
    fn release(&self, outcome: &RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };

        debug!(
            waiters = waiters.len(),
            success = outcome.is_ok(),
            "Releasing callers parked on refresh"
        );

        for waiter in waiters {
            // A waiter whose caller was dropped has nobody to notify
            let _ = waiter.send(outcome.clone());
        }
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RefreshCoordinator")
            .field("in_flight", &state.in_flight)
            .field("waiters", &state.waiters.len())
            .field("refreshes", &self.refresh_count())
            .finish()
    }
}

/// Releases waiters even when the leader's future is dropped mid-refresh
struct LeaderGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    finished: bool,
}

impl LeaderGuard<'_> {
    fn finish(mut self, outcome: &RefreshOutcome) {
        self.finished = true;
        self.coordinator.release(outcome);
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.coordinator.release(&Err(RefreshError::abandoned()));
        }
    }
}

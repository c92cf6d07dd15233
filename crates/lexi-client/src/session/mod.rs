//! Session refresh coordination

mod coordinator;

pub use coordinator::{RefreshCoordinator, RefreshOutcome};

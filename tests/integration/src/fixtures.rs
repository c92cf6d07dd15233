//! Test fixtures and data generators

use std::sync::atomic::{AtomicU64, Ordering};

use lexi_core::RegisterRequest;

use crate::backend::VALID_PASSWORD;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Unique student email with the password the fake backend accepts
pub fn student_credentials() -> (String, String) {
    let suffix = unique_suffix();
    (
        format!("student{suffix}@example.com"),
        VALID_PASSWORD.to_string(),
    )
}

/// Valid registration for a unique student
pub fn register_request() -> RegisterRequest {
    let (email, password) = student_credentials();
    RegisterRequest {
        name: "Test Student".to_string(),
        email,
        password,
        role: Some("student".to_string()),
    }
}

/// Small fake audio clip
pub fn audio_clip() -> Vec<u8> {
    (0..=255u8).cycle().take(4096).collect()
}

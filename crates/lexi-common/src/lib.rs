//! # lexi-common
//!
//! Shared utilities for the LexiLearn client: configuration and telemetry.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    normalize_base_url, normalize_route, ApiConfig, AppSettings, ClientConfig, ConfigError,
    Environment, SessionConfig,
};
pub use telemetry::{init_tracing, init_tracing_for, LogFormat, TracingConfig, TracingError};

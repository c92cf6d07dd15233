//! Tracing subscriber setup for applications embedding the client
//!
//! `RUST_LOG` always wins; otherwise the preset's filter directives apply.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Environment;

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

/// Subscriber options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    pub filter: String,
    pub format: LogFormat,
    /// Emit an event when a span closes (request dispatch, refresh)
    pub span_close_events: bool,
    /// Route output through the test harness writer
    pub test_writer: bool,
}

impl TracingConfig {
    /// Client internals at debug, everything else at info
    #[must_use]
    pub fn development() -> Self {
        Self {
            filter: "info,lexi_client=debug,lexi_common=debug".to_string(),
            format: LogFormat::Pretty,
            span_close_events: true,
            test_writer: false,
        }
    }

    #[must_use]
    pub fn production() -> Self {
        Self {
            filter: "warn,lexi_client=info".to_string(),
            format: LogFormat::Json,
            span_close_events: false,
            test_writer: false,
        }
    }

    #[must_use]
    pub fn test() -> Self {
        Self {
            filter: "debug,hyper=info,reqwest=info".to_string(),
            format: LogFormat::Compact,
            span_close_events: false,
            test_writer: true,
        }
    }

    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Staging | Environment::Production => Self::production(),
        }
    }

    /// Replace the default filter directives
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.filter)
                .map_err(|e| TracingError::InvalidFilter(format!("{}: {e}", self.filter))),
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_close_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::development()
    }
}

/// Install the global subscriber.
///
/// Fails with `AlreadyInitialized` if a subscriber is already set, which
/// test binaries calling this once per test can ignore.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    let registry = tracing_subscriber::registry().with(config.env_filter()?);
    let layer = fmt::layer()
        .with_span_events(config.span_events())
        .with_target(true);

    let result = match (config.format, config.test_writer) {
        (LogFormat::Json, _) => registry
            .with(layer.json().with_current_span(true))
            .try_init(),
        (LogFormat::Compact, true) => registry.with(layer.compact().with_test_writer()).try_init(),
        (LogFormat::Compact, false) => registry.with(layer.compact()).try_init(),
        (LogFormat::Pretty, true) => registry.with(layer.pretty().with_test_writer()).try_init(),
        (LogFormat::Pretty, false) => registry.with(layer.pretty()).try_init(),
    };

    result.map_err(|_| TracingError::AlreadyInitialized)?;
    tracing::debug!(
        filter = %config.filter,
        format = ?config.format,
        "Tracing initialized"
    );
    Ok(())
}

/// Install the preset for a deployment environment
pub fn init_tracing_for(env: Environment) -> Result<(), TracingError> {
    init_tracing(&TracingConfig::for_environment(env))
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}

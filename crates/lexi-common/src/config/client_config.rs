//! Client configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Values are validated once, here, so the client never has to
//! re-check them at request time.

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub app: AppSettings,
    pub api: ApiConfig,
    pub session: SessionConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Normalized base URL, no trailing slash
    pub base_url: String,
    /// Whole-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    /// Build an API config for a base URL with default timeouts
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            user_agent: default_user_agent(),
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Override the request timeout, kept to millisecond precision
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout_ms = duration_millis(timeout);
    }

    pub fn set_connect_timeout(&mut self, timeout: Duration) {
        self.connect_timeout_ms = duration_millis(timeout);
    }

    /// Join a relative path onto the base URL
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Session persistence and routing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// File backing the token store; in-memory storage when unset
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    /// Routes on which the user is considered unauthenticated
    #[serde(default = "default_public_routes")]
    pub public_routes: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: None,
            public_routes: default_public_routes(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "lexi-client".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

/// Zero would fail every request, so the floor is one millisecond
fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis())
        .unwrap_or(u64::MAX)
        .max(1)
}

fn default_user_agent() -> String {
    concat!("lexi-client/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_public_routes() -> Vec<String> {
    vec!["/".to_string(), "/login".to_string()]
}

/// Validate and normalize a backend base URL.
///
/// Accepts only `http` and `https` URLs with a non-empty host and strips
/// trailing slashes so relative paths can be appended directly.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');

    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| {
            ConfigError::InvalidValue("LEXI_API_BASE_URL", format!("unsupported scheme: {raw}"))
        })?;

    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidValue(
            "LEXI_API_BASE_URL",
            format!("missing host: {raw}"),
        ));
    }

    Ok(trimmed.to_string())
}

/// Normalize a route path: must start with `/`, no trailing slash except root
pub fn normalize_route(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('/') {
        return Err(ConfigError::InvalidValue(
            "LEXI_PUBLIC_ROUTES",
            format!("route must start with '/': {raw}"),
        ));
    }
    let route = trimmed.trim_end_matches('/');
    if route.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(route.to_string())
    }
}

/// Read a whole number of seconds, returned in milliseconds
fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default_ms: u64,
) -> Result<u64, ConfigError> {
    match lookup(key) {
        None => Ok(default_ms),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(ConfigError::InvalidValue(key, raw)),
            Ok(secs) => Ok(secs.saturating_mul(1000)),
        },
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = match lookup("LEXI_ENV") {
            Some(raw) => {
                Environment::parse(&raw).ok_or(ConfigError::InvalidValue("LEXI_ENV", raw))?
            }
            None => Environment::default(),
        };

        let base_url = normalize_base_url(
            &lookup("LEXI_API_BASE_URL").unwrap_or_else(default_base_url),
        )?;

        let public_routes = match lookup("LEXI_PUBLIC_ROUTES") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(normalize_route)
                .collect::<Result<Vec<_>, _>>()?,
            None => default_public_routes(),
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("LEXI_APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            api: ApiConfig {
                base_url,
                timeout_ms: parse_secs(&lookup, "LEXI_HTTP_TIMEOUT_SECS", default_timeout_ms())?,
                connect_timeout_ms: parse_secs(
                    &lookup,
                    "LEXI_CONNECT_TIMEOUT_SECS",
                    default_connect_timeout_ms(),
                )?,
                user_agent: lookup("LEXI_USER_AGENT").unwrap_or_else(default_user_agent),
            },
            session: SessionConfig {
                token_file: lookup("LEXI_TOKEN_FILE")
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
                public_routes,
            },
        })
    }

    /// Configuration for a base URL with every other value defaulted
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            app: AppSettings {
                name: default_app_name(),
                env: default_env(),
            },
            api: ApiConfig::new(base_url)?,
            session: SessionConfig::default(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

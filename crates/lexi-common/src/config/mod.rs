//! Configuration structs

mod client_config;

pub use client_config::{
    normalize_base_url, normalize_route, ApiConfig, AppSettings, ClientConfig, ConfigError,
    Environment, SessionConfig,
};

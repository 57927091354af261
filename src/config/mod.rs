//! Configuration module for jsonpeek
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`JSONPEEK_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use jsonpeek::config::JsonPeekConfig;
//!
//! let toml = r#"
//! [source]
//! url = "https://example.com/accounts.json"
//! json-path = "0.balance"
//! update-interval = 30
//! "#;
//! let config: JsonPeekConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.source.update_interval, 30);
//! assert_eq!(config.http.timeout_seconds, 10);
//! ```

pub mod display;
pub mod error;
pub mod http;
pub mod logging;
pub mod source;

pub use display::{DisplayConfig, OutputFormat};
pub use error::ConfigError;
pub use http::{HttpConfig, DEFAULT_USER_AGENT};
pub use logging::{LogFormat, LoggingConfig};
pub use source::SourceConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Longest accepted `update-interval`, one day.
pub const MAX_UPDATE_INTERVAL: u64 = 86_400;

/// Unified configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JsonPeekConfig {
    /// What to poll
    pub source: SourceConfig,
    /// HTTP client settings
    pub http: HttpConfig,
    /// Output settings
    pub display: DisplayConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl JsonPeekConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (previous values are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("JSONPEEK_URL") {
            self.source.url = url;
        }
        if let Ok(path) = std::env::var("JSONPEEK_JSON_PATH") {
            self.source.json_path = path;
        }
        if let Ok(interval) = std::env::var("JSONPEEK_UPDATE_INTERVAL") {
            if let Ok(i) = interval.parse() {
                self.source.update_interval = i;
            }
        }

        if let Ok(timeout) = std::env::var("JSONPEEK_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.http.timeout_seconds = t;
            }
        }

        if let Ok(format) = std::env::var("JSONPEEK_DISPLAY_FORMAT") {
            if let Ok(f) = format.parse() {
                self.display.format = f;
            }
        }

        if let Ok(level) = std::env::var("JSONPEEK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("JSONPEEK_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url(&self.source.url)?;

        if self.source.update_interval == 0 || self.source.update_interval > MAX_UPDATE_INTERVAL {
            return Err(ConfigError::validation(
                "source.update-interval",
                format!("must be between 1 and {} seconds", MAX_UPDATE_INTERVAL),
            ));
        }

        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "http.timeout_seconds",
                "timeout must be non-zero",
            ));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::validation(
                "http.user_agent",
                "user agent cannot be empty",
            ));
        }

        Ok(())
    }
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    if url.is_empty() {
        return Err(ConfigError::validation("source.url", "URL cannot be empty"));
    }

    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ConfigError::validation("source.url", e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::validation(
            "source.url",
            format!("unsupported scheme '{}'", other),
        )),
    }
}

//! HTTP client configuration

use serde::{Deserialize, Serialize};

/// User agent sent with every request unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str = concat!("jsonpeek/", env!("CARGO_PKG_VERSION"));

/// The `[http]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

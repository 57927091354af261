//! The process-wide HTTP client.
//!
//! Built on first use and kept for the lifetime of the process so that
//! repeated polls reuse pooled connections. `reqwest::Client` is reference
//! counted internally, so handing out clones is cheap.

use crate::config::HttpConfig;
use std::sync::OnceLock;
use std::time::Duration;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Build a client with the configured timeout and user agent.
///
/// Proxies are resolved from the environment (`HTTP_PROXY`, `HTTPS_PROXY`,
/// `NO_PROXY`) and, where the platform supports it, system settings.
pub fn build_client(config: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.as_str())
        .build()
}

/// The shared client, built from `config` on first call.
///
/// Later calls return the same client; their `config` is ignored.
pub fn shared_client(config: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    if let Some(client) = SHARED_CLIENT.get() {
        return Ok(client.clone());
    }

    let client = build_client(config)?;
    tracing::debug!(
        timeout_seconds = config.timeout_seconds,
        user_agent = %config.user_agent,
        "HTTP client created"
    );
    // A concurrent caller may have won the race; use whichever was stored.
    Ok(SHARED_CLIENT.get_or_init(|| client).clone())
}

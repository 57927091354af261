//! Error types for polling.

use super::state::PollerPhase;
use thiserror::Error;

/// Why a cycle did not produce a document.
///
/// Carried as a value through the cycle and mapped to a display state; never
/// propagated past the cycle boundary.
#[derive(Debug, Clone, Error)]
pub enum CycleError {
    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection, DNS or TLS failure
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request could not be built (empty or malformed URL)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Server answered with something other than 200
    #[error("HTTP error: {0}")]
    Status(u16),

    /// Body could not be read
    #[error("failed to read body: {0}")]
    Body(String),

    /// Body is not valid JSON
    #[error("invalid JSON: {0}")]
    Parse(String),

    /// The cycle panicked
    #[error("cycle panicked: {0}")]
    Panicked(String),
}

impl CycleError {
    /// Classify a reqwest error raised while sending or reading.
    pub fn from_reqwest(e: reqwest::Error, timeout_seconds: u64) -> Self {
        if e.is_timeout() {
            CycleError::Timeout(timeout_seconds)
        } else if e.is_builder() {
            CycleError::InvalidRequest(e.to_string())
        } else if e.is_body() || e.is_decode() {
            CycleError::Body(e.to_string())
        } else {
            // DNS, refused connections and TLS failures all surface here
            CycleError::Connection(e.to_string())
        }
    }

    /// Whether this error shows as the generic transport error.
    pub fn is_transport(&self) -> bool {
        !matches!(self, CycleError::Status(_))
    }
}

/// Errors returned by poller control operations.
#[derive(Debug, Error)]
pub enum PollerError {
    #[error("cannot {operation} a poller in phase {from:?}")]
    InvalidTransition {
        operation: &'static str,
        from: PollerPhase,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

//! One fetch → decode → extract → classify pass.

use super::error::CycleError;
use super::state::DisplayState;
use crate::extract::{extract, stringify, NotFound};
use crate::logging::{redact_url, truncate_body};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Longest body excerpt logged when a response fails to parse.
const BODY_PREVIEW_CHARS: usize = 200;

/// Result of one cycle, ready to render.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub state: DisplayState,
    /// Set when no document was obtained
    pub error: Option<CycleError>,
    /// Set when the document was fetched but the path missed
    pub miss: Option<NotFound>,
    pub elapsed: Duration,
}

impl CycleOutcome {
    pub(crate) fn failed(error: CycleError, elapsed: Duration) -> Self {
        let state = match error {
            CycleError::Status(code) => DisplayState::HttpError(code),
            _ => DisplayState::TransportError,
        };
        Self {
            state,
            error: Some(error),
            miss: None,
            elapsed,
        }
    }

    /// Cycle duration in whole milliseconds, saturating.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// GET `url` and parse the body as JSON.
///
/// Only a 200 response is decoded; any other status is returned as
/// [`CycleError::Status`] without reading the body. Invalid UTF-8 is
/// replaced rather than rejected.
pub async fn fetch_document(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Value, CycleError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| CycleError::from_reqwest(e, timeout.as_secs()))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(CycleError::Status(status.as_u16()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| CycleError::from_reqwest(e, timeout.as_secs()))?;
    let body = String::from_utf8_lossy(&bytes);

    serde_json::from_str(&body).map_err(|e| {
        tracing::debug!(
            body = %truncate_body(&body, BODY_PREVIEW_CHARS),
            "Response body is not valid JSON"
        );
        CycleError::Parse(e.to_string())
    })
}

/// Apply `path` to a fetched document.
pub fn classify(document: &Value, path: &str) -> Result<DisplayState, NotFound> {
    extract(document, path).map(|value| DisplayState::Value(stringify(value)))
}

/// Run one complete cycle against `url`.
pub async fn run_cycle(
    client: &reqwest::Client,
    url: &str,
    path: &str,
    timeout: Duration,
) -> CycleOutcome {
    let start = Instant::now();

    let document = match fetch_document(client, url, timeout).await {
        Ok(document) => document,
        Err(error) => {
            if error.is_transport() {
                tracing::warn!(
                    url = %redact_url(url),
                    error = %error,
                    "Fetch failed"
                );
            }
            return CycleOutcome::failed(error, start.elapsed());
        }
    };

    match classify(&document, path) {
        Ok(state) => CycleOutcome {
            state,
            error: None,
            miss: None,
            elapsed: start.elapsed(),
        },
        Err(miss) => {
            tracing::debug!(json_path = %path, error = %miss, "Path did not resolve");
            CycleOutcome {
                state: DisplayState::NotAvailable,
                error: None,
                miss: Some(miss),
                elapsed: start.elapsed(),
            }
        }
    }
}

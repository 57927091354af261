//! Get command implementation

use crate::cli::run::load_config_with_overrides;
use crate::cli::GetArgs;
use crate::display::{DisplaySurface, StdoutDisplay};
use crate::logging::init_tracing;
use crate::poller::{client, run_cycle, CycleOutcome, DisplayState};
use std::time::Duration;

/// Describe why a cycle produced no value, for the exit error.
pub fn failure_reason(outcome: &CycleOutcome) -> Option<String> {
    if outcome.state.is_value() {
        return None;
    }
    let reason = match (&outcome.error, &outcome.miss) {
        (Some(error), _) => error.to_string(),
        (None, Some(miss)) => miss.to_string(),
        (None, None) => match &outcome.state {
            DisplayState::HttpError(code) => format!("HTTP error: {}", code),
            other => format!("no value ({})", other),
        },
    };
    Some(reason)
}

/// Handle `jsonpeek get`: one cycle, printed in the configured format.
///
/// Exits with an error unless the path resolved to a value.
pub async fn handle_get(args: GetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.source, None)?;
    config.validate()?;

    init_tracing(&config.logging)?;

    let client = client::build_client(&config.http)?;
    let outcome = run_cycle(
        &client,
        &config.source.url,
        &config.source.json_path,
        Duration::from_secs(config.http.timeout_seconds),
    )
    .await;

    tracing::debug!(
        state = %outcome.state,
        elapsed_ms = outcome.elapsed_ms(),
        "Fetched once"
    );

    StdoutDisplay::stdout(config.display.format).render(&outcome.state);

    match failure_reason(&outcome) {
        None => Ok(()),
        Some(reason) => Err(reason.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{NotFound, PathSegment};
    use crate::poller::CycleError;

    fn outcome(state: DisplayState) -> CycleOutcome {
        CycleOutcome {
            state,
            error: None,
            miss: None,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_value_is_success() {
        assert!(failure_reason(&outcome(DisplayState::Value("42".into()))).is_none());
    }

    #[test]
    fn test_status_error_reason() {
        let mut failed = outcome(DisplayState::HttpError(404));
        failed.error = Some(CycleError::Status(404));
        assert_eq!(failure_reason(&failed).unwrap(), "HTTP error: 404");
    }

    #[test]
    fn test_miss_reason_names_segment() {
        let mut missed = outcome(DisplayState::NotAvailable);
        missed.miss = Some(NotFound {
            position: 1,
            segment: PathSegment::Key("balance".into()),
        });
        let reason = failure_reason(&missed).unwrap();
        assert!(reason.contains("balance"));
    }
}

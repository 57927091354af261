//! Display states, poller phases and the pending-timer handle.

use crate::config::MAX_UPDATE_INTERVAL;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// The classified, renderable outcome of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    /// Nothing fetched yet
    Loading,
    /// The extracted value, already stringified
    Value(String),
    /// Valid JSON, but the path did not resolve
    NotAvailable,
    /// Server answered with a status other than 200
    HttpError(u16),
    /// Network failure, timeout or malformed body
    TransportError,
}

impl DisplayState {
    /// Short class name for styling.
    pub fn class(&self) -> &'static str {
        match self {
            DisplayState::Loading => "loading",
            DisplayState::Value(_) => "value",
            DisplayState::NotAvailable => "not-available",
            DisplayState::HttpError(_) => "http-error",
            DisplayState::TransportError => "error",
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, DisplayState::Value(_))
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayState::Loading => f.write_str("loading..."),
            DisplayState::Value(v) => f.write_str(v),
            DisplayState::NotAvailable => f.write_str("N/A"),
            DisplayState::HttpError(code) => write!(f, "Err {}", code),
            DisplayState::TransportError => f.write_str("Error"),
        }
    }
}

/// Where the poller is in its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerPhase {
    /// Constructed, not started
    Idle,
    /// Request in flight
    Fetching,
    /// Pushing the new state to the display
    Rendering,
    /// Waiting for the pending timer
    Scheduled,
    /// Terminal
    Stopped,
}

/// One pending scheduled cycle.
///
/// A poller holds at most one; arming a new handle replaces the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    /// Sequence number, one per armed timer
    pub generation: u64,
    /// Delay read from the settings when the timer was armed
    pub interval: Duration,
    /// When the next cycle starts
    pub deadline: Instant,
}

impl TimerHandle {
    /// Arm a timer `interval` from now. An interval past the clock's range
    /// falls back to the longest allowed interval.
    pub(crate) fn arm(generation: u64, interval: Duration) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(interval)
            .unwrap_or_else(|| now + Duration::from_secs(MAX_UPDATE_INTERVAL));
        Self {
            generation,
            interval,
            deadline,
        }
    }

    /// Time left before the timer fires, zero once due.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

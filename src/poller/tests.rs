//! Unit tests for the poller module.

use super::*;
use crate::config::SourceConfig;
use crate::settings::{SettingKey, SettingValue, SharedSettings};
use serde_json::json;
use std::sync::Mutex;

// ============================================================================
// Test doubles
// ============================================================================

#[derive(Default)]
struct RecordingDisplay {
    texts: Mutex<Vec<String>>,
}

impl RecordingDisplay {
    fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn set_text(&self, text: &str) {
        self.texts.lock().unwrap().push(text.to_string());
    }
}

struct PanickingDisplay;

impl DisplaySurface for PanickingDisplay {
    fn set_text(&self, _text: &str) {
        panic!("display is gone");
    }
}

/// Panics whenever the url is read.
struct BrokenSettings;

impl SettingsProvider for BrokenSettings {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        match key {
            SettingKey::Url => panic!("settings backend exploded"),
            SettingKey::JsonPath => Some(SettingValue::Str(String::new())),
            SettingKey::UpdateInterval => Some(SettingValue::Int(1)),
        }
    }
}

/// Settings whose empty url fails request building without touching the network.
fn offline_settings(interval: u64) -> SharedSettings {
    SharedSettings::new(SourceConfig {
        url: String::new(),
        json_path: "0".to_string(),
        update_interval: interval,
    })
}

async fn wait_for_cycles(poller: &Poller, count: u64) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while poller.cycles_completed() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("poller did not complete enough cycles");
}

// ============================================================================
// DisplayState
// ============================================================================

#[test]
fn test_display_state_text() {
    assert_eq!(DisplayState::Loading.to_string(), "loading...");
    assert_eq!(DisplayState::Value("42".into()).to_string(), "42");
    assert_eq!(DisplayState::NotAvailable.to_string(), "N/A");
    assert_eq!(DisplayState::HttpError(404).to_string(), "Err 404");
    assert_eq!(DisplayState::TransportError.to_string(), "Error");
}

#[test]
fn test_display_state_value_null_differs_from_not_available() {
    let null = DisplayState::Value("null".into());
    assert_ne!(null, DisplayState::NotAvailable);
    assert_ne!(null.to_string(), DisplayState::NotAvailable.to_string());
    assert!(null.is_value());
}

#[test]
fn test_display_state_classes() {
    assert_eq!(DisplayState::Loading.class(), "loading");
    assert_eq!(DisplayState::Value("x".into()).class(), "value");
    assert_eq!(DisplayState::NotAvailable.class(), "not-available");
    assert_eq!(DisplayState::HttpError(500).class(), "http-error");
    assert_eq!(DisplayState::TransportError.class(), "error");
}

// ============================================================================
// CycleError
// ============================================================================

#[test]
fn test_cycle_error_display() {
    assert_eq!(CycleError::Timeout(10).to_string(), "request timeout after 10s");
    assert_eq!(CycleError::Status(503).to_string(), "HTTP error: 503");
    assert_eq!(
        CycleError::Parse("expected value".into()).to_string(),
        "invalid JSON: expected value"
    );
}

#[test]
fn test_cycle_error_transport_classification() {
    assert!(!CycleError::Status(404).is_transport());
    assert!(CycleError::Timeout(10).is_transport());
    assert!(CycleError::Connection("refused".into()).is_transport());
    assert!(CycleError::Parse("bad".into()).is_transport());
    assert!(CycleError::Panicked("boom".into()).is_transport());
}

#[test]
fn test_failed_outcome_states() {
    let outcome = CycleOutcome::failed(CycleError::Status(404), Duration::ZERO);
    assert_eq!(outcome.state, DisplayState::HttpError(404));

    let outcome = CycleOutcome::failed(CycleError::Parse("eof".into()), Duration::ZERO);
    assert_eq!(outcome.state, DisplayState::TransportError);
    assert!(outcome.error.is_some());
    assert!(outcome.miss.is_none());
}

#[test]
fn test_elapsed_ms_saturates() {
    let mut outcome = CycleOutcome::failed(CycleError::Status(500), Duration::from_millis(1500));
    assert_eq!(outcome.elapsed_ms(), 1500);

    outcome.elapsed = Duration::MAX;
    assert_eq!(outcome.elapsed_ms(), u64::MAX);
}

// ============================================================================
// classify
// ============================================================================

#[test]
fn test_classify_hit() {
    let doc = json!([{"balance": 42}]);
    assert_eq!(
        classify(&doc, "0.balance").unwrap(),
        DisplayState::Value("42".into())
    );
}

#[test]
fn test_classify_null_hit() {
    let doc = json!({"balance": null});
    assert_eq!(
        classify(&doc, "balance").unwrap(),
        DisplayState::Value("null".into())
    );
}

#[test]
fn test_classify_miss() {
    let doc = json!({"0": {"balance": 42}});
    assert!(classify(&doc, "0.balance").is_err());
}

// ============================================================================
// TimerHandle
// ============================================================================

#[tokio::test]
async fn test_timer_handle_deadline() {
    let timer = TimerHandle::arm(1, Duration::from_secs(30));
    assert_eq!(timer.interval, Duration::from_secs(30));
    assert!(timer.remaining() <= Duration::from_secs(30));
    assert!(timer.remaining() > Duration::from_secs(29));
}

#[tokio::test]
async fn test_timer_handle_survives_unrepresentable_interval() {
    let timer = TimerHandle::arm(1, Duration::MAX);
    assert_eq!(timer.interval, Duration::MAX);
    assert!(timer.remaining() <= Duration::from_secs(crate::config::MAX_UPDATE_INTERVAL));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_new_poller_is_idle() {
    let display = Arc::new(RecordingDisplay::default());
    let poller = Poller::new(offline_settings(60), display.clone(), reqwest::Client::new());

    assert_eq!(poller.phase(), PollerPhase::Idle);
    assert_eq!(poller.current_state(), DisplayState::Loading);
    assert!(poller.pending_timer().is_none());
    assert!(display.texts().is_empty());
}

#[tokio::test]
async fn test_start_renders_loading_then_first_cycle() {
    let display = Arc::new(RecordingDisplay::default());
    let mut poller = Poller::new(offline_settings(60), display.clone(), reqwest::Client::new());

    poller.start().unwrap();
    wait_for_cycles(&poller, 1).await;

    assert_eq!(display.texts(), vec!["loading...", "Error"]);
    assert_eq!(poller.current_state(), DisplayState::TransportError);
    assert_eq!(poller.phase(), PollerPhase::Scheduled);

    let timer = poller.pending_timer().unwrap();
    assert_eq!(timer.interval, Duration::from_secs(60));
    poller.stop();
}

#[tokio::test]
async fn test_start_twice_is_rejected() {
    let mut poller = Poller::new(
        offline_settings(60),
        RecordingDisplay::default(),
        reqwest::Client::new(),
    );
    poller.start().unwrap();

    let err = poller.start().unwrap_err();
    assert!(matches!(err, PollerError::InvalidTransition { operation: "start", .. }));
    poller.stop();
}

#[tokio::test]
async fn test_stop_clears_timer_and_is_idempotent() {
    let mut poller = Poller::new(
        offline_settings(60),
        RecordingDisplay::default(),
        reqwest::Client::new(),
    );
    poller.start().unwrap();
    wait_for_cycles(&poller, 1).await;
    assert!(poller.pending_timer().is_some());

    poller.stop();
    assert_eq!(poller.phase(), PollerPhase::Stopped);
    assert!(poller.pending_timer().is_none());

    poller.stop();
    assert_eq!(poller.phase(), PollerPhase::Stopped);
}

#[tokio::test]
async fn test_stopped_poller_cannot_restart() {
    let mut poller = Poller::new(
        offline_settings(60),
        RecordingDisplay::default(),
        reqwest::Client::new(),
    );
    poller.stop();

    let err = poller.start().unwrap_err();
    assert!(matches!(
        err,
        PollerError::InvalidTransition {
            from: PollerPhase::Stopped,
            ..
        }
    ));
    assert!(!poller.refresh_now());
}

#[tokio::test]
async fn test_join_after_stop_returns() {
    let mut poller = Poller::new(
        offline_settings(60),
        RecordingDisplay::default(),
        reqwest::Client::new(),
    );
    poller.start().unwrap();
    wait_for_cycles(&poller, 1).await;
    poller.stop();

    tokio::time::timeout(Duration::from_secs(1), poller.join())
        .await
        .expect("poll task did not exit after stop");
}

#[tokio::test]
async fn test_refresh_now_runs_cycle_before_timer() {
    let display = Arc::new(RecordingDisplay::default());
    let mut poller = Poller::new(offline_settings(3600), display.clone(), reqwest::Client::new());

    assert!(!poller.refresh_now());
    poller.start().unwrap();
    wait_for_cycles(&poller, 1).await;
    let first = poller.pending_timer().unwrap();

    assert!(poller.refresh_now());
    wait_for_cycles(&poller, 2).await;

    let second = poller.pending_timer().unwrap();
    assert!(second.generation > first.generation);
    assert_eq!(display.texts(), vec!["loading...", "Error", "Error"]);
    poller.stop();
}

#[tokio::test]
async fn test_panicking_settings_map_to_transport_error() {
    let display = Arc::new(RecordingDisplay::default());
    let mut poller = Poller::new(BrokenSettings, display.clone(), reqwest::Client::new());

    poller.start().unwrap();
    wait_for_cycles(&poller, 1).await;

    assert_eq!(display.texts(), vec!["loading...", "Error"]);
    assert_eq!(poller.current_state(), DisplayState::TransportError);
    assert_eq!(poller.phase(), PollerPhase::Scheduled);
    poller.stop();
}

#[tokio::test]
async fn test_panicking_display_does_not_kill_loop() {
    let mut poller = Poller::new(offline_settings(1), PanickingDisplay, reqwest::Client::new());

    poller.start().unwrap();
    wait_for_cycles(&poller, 2).await;

    assert_eq!(poller.current_state(), DisplayState::TransportError);
    poller.stop();
}

#[tokio::test]
async fn test_phase_subscription_reaches_scheduled() {
    let mut poller = Poller::new(
        offline_settings(60),
        RecordingDisplay::default(),
        reqwest::Client::new(),
    );
    let mut phases = poller.subscribe_phase();

    poller.start().unwrap();
    tokio::time::timeout(
        Duration::from_secs(5),
        phases.wait_for(|p| *p == PollerPhase::Scheduled),
    )
    .await
    .expect("never scheduled")
    .unwrap();

    poller.stop();
    assert_eq!(*phases.borrow_and_update(), PollerPhase::Stopped);
}

#[tokio::test]
async fn test_huge_interval_still_schedules_and_refreshes() {
    let settings = offline_settings(u64::MAX);
    let display = Arc::new(RecordingDisplay::default());
    let mut poller = Poller::new(settings.clone(), display.clone(), reqwest::Client::new());

    poller.start().unwrap();
    wait_for_cycles(&poller, 1).await;

    assert_eq!(poller.phase(), PollerPhase::Scheduled);
    let timer = poller.pending_timer().unwrap();
    assert_eq!(
        timer.interval,
        Duration::from_secs(crate::config::MAX_UPDATE_INTERVAL)
    );

    // The loop is alive: a refresh runs another cycle with the new interval
    settings.set_update_interval(1);
    assert!(poller.refresh_now());
    wait_for_cycles(&poller, 2).await;

    assert_eq!(display.texts(), vec!["loading...", "Error", "Error"]);
    assert_eq!(poller.pending_timer().unwrap().interval, Duration::from_secs(1));
    poller.stop();
}

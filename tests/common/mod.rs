//! Shared test utilities for jsonpeek integration tests.

#![allow(dead_code)]

use jsonpeek::config::SourceConfig;
use jsonpeek::display::DisplaySurface;
use jsonpeek::poller::Poller;
use jsonpeek::settings::SharedSettings;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::MockServer;

/// Upper bound on how long a test waits for the poller to make progress.
pub const PROGRESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Display that records every text it is handed.
#[derive(Default)]
pub struct RecordingDisplay {
    texts: Mutex<Vec<String>>,
}

impl RecordingDisplay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.texts.lock().unwrap().last().cloned()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn set_text(&self, text: &str) {
        self.texts.lock().unwrap().push(text.to_string());
    }
}

/// Settings pointing at `route` on the mock server.
pub fn settings_for(server: &MockServer, route: &str, json_path: &str, interval: u64) -> SharedSettings {
    SharedSettings::new(SourceConfig {
        url: format!("{}{}", server.uri(), route),
        json_path: json_path.to_string(),
        update_interval: interval,
    })
}

/// Block until the poller has completed at least `count` cycles.
pub async fn wait_for_cycles(poller: &Poller, count: u64) {
    tokio::time::timeout(PROGRESS_TIMEOUT, async {
        while poller.cycles_completed() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| {
        panic!(
            "poller completed {} cycles, expected {}",
            poller.cycles_completed(),
            count
        )
    });
}

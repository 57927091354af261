//! Self-rescheduling JSON poller.
//!
//! A [`Poller`] runs one task that loops through
//! `Fetching -> Rendering -> Scheduled -> Fetching ...` until stopped. Each
//! cycle reads the settings fresh, fetches the document, classifies the
//! outcome into a [`DisplayState`], renders it, then arms a single
//! [`TimerHandle`] using the interval read at that moment.
//!
//! ```no_run
//! use jsonpeek::config::{HttpConfig, OutputFormat, SourceConfig};
//! use jsonpeek::display::StdoutDisplay;
//! use jsonpeek::poller::{client, Poller};
//! use jsonpeek::settings::SharedSettings;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SharedSettings::new(SourceConfig {
//!     url: "https://example.com/accounts.json".to_string(),
//!     json_path: "0.balance".to_string(),
//!     update_interval: 30,
//! });
//! let client = client::shared_client(&HttpConfig::default())?;
//!
//! let mut poller = Poller::new(settings.clone(), StdoutDisplay::stdout(OutputFormat::Plain), client);
//! poller.start()?;
//!
//! // Picked up by the next reschedule
//! settings.set_update_interval(10);
//!
//! poller.stop();
//! # Ok(())
//! # }
//! ```

pub mod client;
mod cycle;
mod error;
mod state;

#[cfg(test)]
mod tests;

pub use cycle::{classify, fetch_document, run_cycle, CycleOutcome};
pub use error::*;
pub use state::*;

use crate::display::DisplaySurface;
use crate::logging::redact_url;
use crate::settings::SettingsProvider;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Request timeout used unless [`Poller::with_request_timeout`] says otherwise.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// State shared between the poller handle and its task.
struct Shared {
    settings: Arc<dyn SettingsProvider>,
    display: Arc<dyn DisplaySurface>,
    client: reqwest::Client,
    phase: watch::Sender<PollerPhase>,
    state: watch::Sender<DisplayState>,
    /// The pending timer; also serializes rendering against `stop()`
    timer: Mutex<Option<TimerHandle>>,
    refresh: Notify,
    cancel_token: CancellationToken,
    generation: AtomicU64,
    cycles: AtomicU64,
}

/// Polls a JSON endpoint and renders one value from it on a fixed cadence.
pub struct Poller {
    shared: Arc<Shared>,
    request_timeout: Duration,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    /// Create an idle poller. Nothing happens until [`start`](Self::start).
    pub fn new(
        settings: impl SettingsProvider + 'static,
        display: impl DisplaySurface + 'static,
        client: reqwest::Client,
    ) -> Self {
        let (phase, _) = watch::channel(PollerPhase::Idle);
        let (state, _) = watch::channel(DisplayState::Loading);

        Self {
            shared: Arc::new(Shared {
                settings: Arc::new(settings),
                display: Arc::new(display),
                client,
                phase,
                state,
                timer: Mutex::new(None),
                refresh: Notify::new(),
                cancel_token: CancellationToken::new(),
                generation: AtomicU64::new(0),
                cycles: AtomicU64::new(0),
            }),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            task: None,
        }
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Render `Loading` and begin the first cycle immediately.
    ///
    /// Must be called from within a tokio runtime. Only valid on an idle
    /// poller; a stopped poller cannot be restarted.
    pub fn start(&mut self) -> Result<(), PollerError> {
        let phase = self.phase();
        if phase != PollerPhase::Idle {
            return Err(PollerError::InvalidTransition {
                operation: "start",
                from: phase,
            });
        }

        self.shared.publish(DisplayState::Loading);
        self.shared.set_phase(PollerPhase::Fetching);

        let shared = Arc::clone(&self.shared);
        let timeout = self.request_timeout;
        self.task = Some(tokio::spawn(async move { shared.run(timeout).await }));

        tracing::info!(
            request_timeout_seconds = timeout.as_secs(),
            "Poller started"
        );
        Ok(())
    }

    /// Cancel the pending timer and stop polling.
    ///
    /// Idempotent. After this returns no further render happens. A fetch
    /// already in flight runs to completion but its result is discarded.
    pub fn stop(&self) {
        let mut timer = self.shared.lock_timer();
        if self.shared.cancel_token.is_cancelled() {
            return;
        }

        self.shared.cancel_token.cancel();
        if let Some(pending) = timer.take() {
            tracing::debug!(generation = pending.generation, "Pending timer cancelled");
        }
        self.shared.phase.send_replace(PollerPhase::Stopped);

        tracing::info!(cycles = self.cycles_completed(), "Poller stopped");
    }

    /// Skip the pending timer and run a cycle now.
    ///
    /// A request made while a cycle is running starts the next cycle as soon
    /// as the current one has rendered. Returns `false` when the poller is
    /// idle or stopped.
    pub fn refresh_now(&self) -> bool {
        match self.phase() {
            PollerPhase::Fetching | PollerPhase::Rendering | PollerPhase::Scheduled => {
                self.shared.refresh.notify_one();
                true
            }
            PollerPhase::Idle | PollerPhase::Stopped => false,
        }
    }

    /// Wait for the poll task to finish. Call after [`stop`](Self::stop).
    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Poll task ended abnormally");
            }
        }
    }

    pub fn phase(&self) -> PollerPhase {
        *self.shared.phase.borrow()
    }

    /// The most recently rendered state.
    pub fn current_state(&self) -> DisplayState {
        self.shared.state.borrow().clone()
    }

    /// The timer waiting to start the next cycle, if any.
    pub fn pending_timer(&self) -> Option<TimerHandle> {
        *self.shared.lock_timer()
    }

    /// Number of cycles that rendered and armed the next timer.
    pub fn cycles_completed(&self) -> u64 {
        self.shared.cycles.load(Ordering::Relaxed)
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<PollerPhase> {
        self.shared.phase.subscribe()
    }

    /// Receives every rendered state, including repeats of the same value.
    pub fn subscribe_state(&self) -> watch::Receiver<DisplayState> {
        self.shared.state.subscribe()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    async fn run(self: Arc<Self>, request_timeout: Duration) {
        loop {
            if self.cancel_token.is_cancelled() {
                break;
            }
            self.set_phase(PollerPhase::Fetching);

            let outcome = self.guarded_cycle(request_timeout).await;
            tracing::debug!(
                state = %outcome.state,
                elapsed_ms = outcome.elapsed_ms(),
                "Poll cycle completed"
            );

            self.set_phase(PollerPhase::Rendering);
            if !self.publish(outcome.state) {
                break;
            }

            let Some(timer) = self.arm_timer() else {
                break;
            };
            self.cycles.fetch_add(1, Ordering::Relaxed);

            tokio::select! {
                biased;
                _ = self.cancel_token.cancelled() => break,
                _ = self.refresh.notified() => {
                    tracing::debug!(generation = timer.generation, "Refresh requested, skipping pending timer");
                }
                _ = tokio::time::sleep_until(timer.deadline) => {}
            }
            self.clear_timer(timer.generation);
        }

        tracing::debug!("Poll loop exited");
    }

    /// Fetch and classify, mapping any panic to a transport error.
    async fn guarded_cycle(&self, request_timeout: Duration) -> CycleOutcome {
        let start = Instant::now();

        let cycle = async {
            let url = self.settings.url();
            let path = self.settings.json_path();
            tracing::debug!(
                url = %redact_url(&url),
                json_path = %path,
                update_interval_seconds = self.settings.update_interval().as_secs(),
                "Poll cycle starting"
            );
            run_cycle(&self.client, &url, &path, request_timeout).await
        };

        match AssertUnwindSafe(cycle).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                let message = panic_message(&*panic);
                tracing::error!(error = %message, "Poll cycle panicked");
                CycleOutcome::failed(CycleError::Panicked(message), start.elapsed())
            }
        }
    }

    /// Record and render `state` unless stopped. Returns `false` when stopped.
    fn publish(&self, state: DisplayState) -> bool {
        let _timer = self.lock_timer();
        if self.cancel_token.is_cancelled() {
            return false;
        }

        let rendered = std::panic::catch_unwind(AssertUnwindSafe(|| self.display.render(&state)));
        if let Err(panic) = rendered {
            tracing::error!(
                error = %panic_message(&*panic),
                "Display surface panicked while rendering"
            );
        }
        self.state.send_replace(state);
        true
    }

    /// Arm the next timer with the interval read now, replacing any previous one.
    fn arm_timer(&self) -> Option<TimerHandle> {
        let interval = std::panic::catch_unwind(AssertUnwindSafe(|| self.settings.update_interval()))
            .unwrap_or_else(|panic| {
                tracing::error!(
                    error = %panic_message(&*panic),
                    "Reading update interval panicked, using default"
                );
                Duration::from_secs(crate::settings::DEFAULT_UPDATE_INTERVAL)
            });

        let mut slot = self.lock_timer();
        if self.cancel_token.is_cancelled() {
            return None;
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let timer = TimerHandle::arm(generation, interval);
        if let Some(previous) = slot.replace(timer) {
            tracing::trace!(generation = previous.generation, "Replaced pending timer");
        }
        self.set_phase(PollerPhase::Scheduled);

        tracing::trace!(
            generation,
            interval_seconds = interval.as_secs(),
            "Next cycle scheduled"
        );
        Some(timer)
    }

    fn clear_timer(&self, generation: u64) {
        let mut slot = self.lock_timer();
        if slot.as_ref().is_some_and(|t| t.generation == generation) {
            slot.take();
        }
    }

    /// Move to `phase` unless already stopped.
    fn set_phase(&self, phase: PollerPhase) {
        self.phase.send_if_modified(|current| {
            if *current == PollerPhase::Stopped || *current == phase {
                false
            } else {
                *current = phase;
                true
            }
        });
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<TimerHandle>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

//! Run command implementation

use crate::cli::{RunArgs, SourceArgs};
use crate::config::{ConfigError, JsonPeekConfig};
use crate::display::StdoutDisplay;
use crate::logging::{init_tracing, redact_url};
use crate::poller::{client, Poller};
use crate::settings::{FileSettings, LayeredSettings, SettingKey, SettingsProvider, StaticSettings};
use std::sync::Arc;
use std::time::Duration;

/// Load configuration with CLI args taking precedence over env and file.
pub fn load_config_with_overrides(
    args: &SourceArgs,
    interval: Option<u64>,
) -> Result<JsonPeekConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        JsonPeekConfig::load(Some(&args.config))?
    } else {
        JsonPeekConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(ref url) = args.url {
        config.source.url = url.clone();
    }
    if let Some(ref path) = args.json_path {
        config.source.json_path = path.clone();
    }
    if let Some(interval) = interval {
        config.source.update_interval = interval;
    }
    if let Some(format) = args.format {
        config.display.format = format;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Pick the settings the poller reads each cycle.
///
/// With a config file on disk the poller follows edits to it, except for
/// values pinned on the command line. Without one the startup values are
/// used for the whole run.
pub fn build_settings(
    args: &SourceArgs,
    interval: Option<u64>,
    config: &JsonPeekConfig,
) -> Result<Arc<dyn SettingsProvider>, ConfigError> {
    if !args.config.exists() {
        return Ok(Arc::new(StaticSettings::new(config.source.clone())));
    }

    let layered = LayeredSettings::new(FileSettings::open(&args.config)?)
        .with_optional_override(SettingKey::Url, args.url.clone())
        .with_optional_override(SettingKey::JsonPath, args.json_path.clone())
        .with_optional_override(
            SettingKey::UpdateInterval,
            interval.map(|i| i64::try_from(i).unwrap_or(i64::MAX)),
        );

    tracing::debug!(
        path = %args.config.display(),
        pinned = layered.has_overrides(),
        "Following config file for settings"
    );
    Ok(Arc::new(layered))
}

/// Wait for SIGINT or SIGTERM, refreshing on SIGUSR1 in the meantime.
async fn wait_for_shutdown(poller: &Poller) -> std::io::Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        let mut refresh = signal(SignalKind::user_defined1())?;

        loop {
            tokio::select! {
                result = &mut ctrl_c => {
                    result?;
                    tracing::info!("Received SIGINT, shutting down...");
                    return Ok(());
                }
                _ = terminate.recv() => {
                    tracing::info!("Received SIGTERM, shutting down...");
                    return Ok(());
                }
                _ = refresh.recv() => {
                    tracing::info!("Received SIGUSR1, refreshing");
                    poller.refresh_now();
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = poller;
        ctrl_c.await?;
        tracing::info!("Received SIGINT, shutting down...");
        Ok(())
    }
}

/// Main run command handler
pub async fn run_poller(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.source, args.interval)?;
    config.validate()?;

    init_tracing(&config.logging)?;

    tracing::info!(
        url = %redact_url(&config.source.url),
        json_path = %config.source.json_path,
        update_interval_seconds = config.source.update_interval,
        format = ?config.display.format,
        "Starting jsonpeek"
    );

    let settings = build_settings(&args.source, args.interval, &config)?;
    let client = client::shared_client(&config.http)?;
    let display = StdoutDisplay::stdout(config.display.format);

    let mut poller = Poller::new(settings, display, client)
        .with_request_timeout(Duration::from_secs(config.http.timeout_seconds));
    poller.start()?;

    let signal_result = wait_for_shutdown(&poller).await;

    poller.stop();
    poller.join().await;

    tracing::info!("Shutdown complete");
    signal_result.map_err(Into::into)
}

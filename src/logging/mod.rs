//! Structured logging setup
//!
//! Logs are always written to stderr; stdout belongs to the display.

pub mod fields;

pub use fields::{redact_url, truncate_body};

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels configured in the LoggingConfig.
///
/// # Examples
///
/// ```
/// use jsonpeek::config::LoggingConfig;
/// use jsonpeek::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let mut component_levels = HashMap::new();
/// component_levels.insert("poller".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "warn".to_string(),
///     component_levels: Some(component_levels),
///     ..Default::default()
/// };
///
/// assert_eq!(build_filter_directives(&config), "warn,jsonpeek::poller=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",jsonpeek::{}={}", component, level));
        }
    }

    filter_str
}

/// Initialize tracing based on configuration
///
/// `RUST_LOG` takes precedence over the configured levels.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_filter_directives_base_level_only() {
        let config = LoggingConfig::default();
        assert_eq!(build_filter_directives(&config), "info");
    }

    #[test]
    fn test_filter_directives_sorted_components() {
        let config = LoggingConfig {
            level: "info".to_string(),
            component_levels: Some(HashMap::from([
                ("settings".to_string(), "trace".to_string()),
                ("poller".to_string(), "debug".to_string()),
            ])),
            ..Default::default()
        };
        assert_eq!(
            build_filter_directives(&config),
            "info,jsonpeek::poller=debug,jsonpeek::settings=trace"
        );
    }
}

//! Settings backed by the TOML config file, reloaded when the file changes.

use super::{SettingKey, SettingValue, SettingsProvider};
use crate::config::{ConfigError, JsonPeekConfig, SourceConfig};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

/// Modification time and length, compared to detect edits.
type Fingerprint = (Option<SystemTime>, u64);

#[derive(Debug)]
struct Loaded {
    fingerprint: Fingerprint,
    source: SourceConfig,
}

/// Reads the `[source]` table of a config file.
///
/// Each lookup checks whether the file changed since the last load and
/// reloads it if so. A file that fails to read or parse keeps the last good
/// values in effect.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    loaded: RwLock<Loaded>,
}

impl FileSettings {
    /// Load the file once; fails if it cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let fingerprint = fingerprint(&path);
        let config = JsonPeekConfig::load(Some(&path))?;

        Ok(Self {
            path,
            loaded: RwLock::new(Loaded {
                fingerprint,
                source: config.source,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file unconditionally.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let fingerprint = fingerprint(&self.path);
        let result = JsonPeekConfig::load(Some(&self.path));

        let mut loaded = self.loaded.write().unwrap_or_else(PoisonError::into_inner);
        // Record the attempt even on failure so a broken file is reported once.
        loaded.fingerprint = fingerprint;
        let config = result?;

        if loaded.source != config.source {
            tracing::info!(
                path = %self.path.display(),
                json_path = %config.source.json_path,
                update_interval = config.source.update_interval,
                "Settings reloaded"
            );
        }
        loaded.source = config.source;
        Ok(())
    }

    fn reload_if_changed(&self) {
        let current = fingerprint(&self.path);
        let stale = {
            let loaded = self.loaded.read().unwrap_or_else(PoisonError::into_inner);
            loaded.fingerprint != current
        };

        if stale {
            if let Err(e) = self.reload() {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to reload settings, keeping previous values"
                );
            }
        }
    }
}

impl SettingsProvider for FileSettings {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        self.reload_if_changed();
        let loaded = self.loaded.read().unwrap_or_else(PoisonError::into_inner);
        Some(loaded.source.get(key))
    }
}

fn fingerprint(path: &Path) -> Fingerprint {
    match std::fs::metadata(path) {
        Ok(meta) => (meta.modified().ok(), meta.len()),
        Err(_) => (None, 0),
    }
}

//! In-memory settings providers.

use super::{SettingKey, SettingValue, SettingsProvider};
use crate::config::SourceConfig;
use std::sync::{Arc, PoisonError, RwLock};

/// Fixed settings that never change.
#[derive(Debug, Clone)]
pub struct StaticSettings(SourceConfig);

impl StaticSettings {
    pub fn new(source: SourceConfig) -> Self {
        Self(source)
    }
}

impl SettingsProvider for StaticSettings {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        Some(self.0.get(key))
    }
}

/// Settings a host can mutate while a poller is running.
///
/// Clones share the same underlying values.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<SourceConfig>>,
}

impl SharedSettings {
    pub fn new(source: SourceConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(source)),
        }
    }

    pub fn set_url(&self, url: impl Into<String>) {
        self.update(|s| s.url = url.into());
    }

    pub fn set_json_path(&self, path: impl Into<String>) {
        self.update(|s| s.json_path = path.into());
    }

    pub fn set_update_interval(&self, seconds: u64) {
        self.update(|s| s.update_interval = seconds);
    }

    /// Apply several changes under one write lock.
    pub fn update(&self, f: impl FnOnce(&mut SourceConfig)) {
        let mut source = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut source);
    }

    pub fn snapshot(&self) -> SourceConfig {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsProvider for SharedSettings {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        let source = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Some(source.get(key))
    }
}

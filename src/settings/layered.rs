//! Explicit overrides on top of another provider.

use super::{SettingKey, SettingValue, SettingsProvider};
use std::collections::HashMap;

/// Consults fixed overrides before falling back to an inner provider.
///
/// Used to let command-line flags win over a live-reloaded config file.
pub struct LayeredSettings<S> {
    overrides: HashMap<SettingKey, SettingValue>,
    inner: S,
}

impl<S: SettingsProvider> LayeredSettings<S> {
    pub fn new(inner: S) -> Self {
        Self {
            overrides: HashMap::new(),
            inner,
        }
    }

    /// Pin `key` to `value`.
    pub fn with_override(mut self, key: SettingKey, value: impl Into<SettingValue>) -> Self {
        self.overrides.insert(key, value.into());
        self
    }

    /// Pin `key` to `value` when one is given.
    pub fn with_optional_override<V: Into<SettingValue>>(
        self,
        key: SettingKey,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(v) => self.with_override(key, v),
            None => self,
        }
    }

    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }
}

impl<S: SettingsProvider> SettingsProvider for LayeredSettings<S> {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        self.overrides
            .get(&key)
            .cloned()
            .or_else(|| self.inner.get(key))
    }
}

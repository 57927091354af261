//! Settings providers.
//!
//! The poller never snapshots its configuration. Every cycle asks a
//! [`SettingsProvider`] for the current `url`, `json-path` and
//! `update-interval`, so a host can change them at any time and the next
//! cycle picks the change up.

mod file;
mod layered;
mod shared;

pub use file::FileSettings;
pub use layered::LayeredSettings;
pub use shared::{SharedSettings, StaticSettings};

use crate::config::MAX_UPDATE_INTERVAL;
use std::fmt;
use std::time::Duration;

/// Interval used when the provider has no `update-interval`.
pub const DEFAULT_UPDATE_INTERVAL: u64 = 60;

/// Recognized setting keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Url,
    JsonPath,
    UpdateInterval,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [
        SettingKey::Url,
        SettingKey::JsonPath,
        SettingKey::UpdateInterval,
    ];

    /// The key as it appears in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Url => "url",
            SettingKey::JsonPath => "json-path",
            SettingKey::UpdateInterval => "update-interval",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A setting value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Str(String),
    Int(i64),
}

impl SettingValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(s) => Some(s),
            SettingValue::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(i) => Some(*i),
            SettingValue::Str(s) => s.trim().parse().ok(),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Str(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Str(s)
    }
}

impl From<i64> for SettingValue {
    fn from(i: i64) -> Self {
        SettingValue::Int(i)
    }
}

/// Key/value configuration source read by the poller on every cycle.
///
/// Implementations must tolerate concurrent mutation; each `get` is an
/// independent point sample.
pub trait SettingsProvider: Send + Sync {
    fn get(&self, key: SettingKey) -> Option<SettingValue>;

    /// Current `url`, empty when unset.
    fn url(&self) -> String {
        self.get(SettingKey::Url)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Current `json-path`, empty when unset.
    fn json_path(&self) -> String {
        self.get(SettingKey::JsonPath)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Current `update-interval`, clamped to one second ..= one day.
    fn update_interval(&self) -> Duration {
        let secs = self
            .get(SettingKey::UpdateInterval)
            .and_then(|v| v.as_int())
            .unwrap_or(DEFAULT_UPDATE_INTERVAL as i64)
            .clamp(1, MAX_UPDATE_INTERVAL as i64);
        Duration::from_secs(secs.unsigned_abs())
    }
}

impl<T: SettingsProvider + ?Sized> SettingsProvider for std::sync::Arc<T> {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        (**self).get(key)
    }
}

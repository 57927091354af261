//! Source configuration: what to fetch and how often

use crate::settings::{SettingKey, SettingValue, DEFAULT_UPDATE_INTERVAL};
use serde::{Deserialize, Serialize};

/// The `[source]` table.
///
/// Keys use the same kebab-case names as the settings store
/// (`url`, `json-path`, `update-interval`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Endpoint returning a JSON document
    pub url: String,
    /// Dot-separated path into the document
    pub json_path: String,
    /// Seconds between polls
    pub update_interval: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            json_path: String::new(),
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }
}

impl SourceConfig {
    /// Look up one setting by key.
    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::Url => SettingValue::Str(self.url.clone()),
            SettingKey::JsonPath => SettingValue::Str(self.json_path.clone()),
            SettingKey::UpdateInterval => {
                SettingValue::Int(i64::try_from(self.update_interval).unwrap_or(i64::MAX))
            }
        }
    }
}

//! Display configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How each render is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// The label text, one line per render
    #[default]
    Plain,
    /// One JSON object per line for a status bar custom module
    Waybar,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(OutputFormat::Plain),
            "waybar" => Ok(OutputFormat::Waybar),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

/// The `[display]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub format: OutputFormat,
}

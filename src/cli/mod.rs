//! CLI module for jsonpeek
//!
//! # Commands
//!
//! - `run` - Poll the endpoint and print each rendered state
//! - `get` - Run a single cycle and print the result
//! - `extract` - Apply a path to JSON read from a file or stdin
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Poll every 30 seconds, output for a status bar
//! jsonpeek run --url https://example.com/accounts.json --path 0.balance -i 30 -f waybar
//!
//! # Try a path against a local file
//! jsonpeek extract 0.balance -f accounts.json
//! ```

pub mod completions;
pub mod config;
pub mod extract;
pub mod get;
pub mod run;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// jsonpeek - show one value from a JSON endpoint
#[derive(Parser, Debug)]
#[command(
    name = "jsonpeek",
    version,
    about = "Poll a JSON endpoint and render one value from it"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the endpoint until interrupted
    Run(RunArgs),
    /// Fetch once and print the value
    Get(GetArgs),
    /// Apply a path to a local JSON document
    Extract(ExtractArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by commands that talk to the endpoint.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "jsonpeek.toml")]
    pub config: PathBuf,

    /// URL of the JSON document
    #[arg(short, long, env = "JSONPEEK_URL")]
    pub url: Option<String>,

    /// Dot-separated path to the value (e.g. 0.balance)
    #[arg(short = 'p', long = "path", env = "JSONPEEK_JSON_PATH")]
    pub json_path: Option<String>,

    /// Output format (plain, waybar)
    #[arg(short, long, env = "JSONPEEK_DISPLAY_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "JSONPEEK_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Seconds between polls
    #[arg(short, long, env = "JSONPEEK_UPDATE_INTERVAL")]
    pub interval: Option<u64>,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Dot-separated path to the value; empty selects the whole document
    pub path: String,

    /// Read JSON from this file instead of stdin
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "jsonpeek.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

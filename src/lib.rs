//! jsonpeek - poll a JSON endpoint and show one value from it
//!
//! This library provides the path extractor, the self-rescheduling poller,
//! and the settings and display seams a host plugs into it.

pub mod cli;
pub mod config;
pub mod display;
pub mod extract;
pub mod logging;
pub mod poller;
pub mod settings;

//! Extract command implementation
//!
//! Applies a path to a local document without any network access, which is
//! handy for working out the right `json-path` before configuring a poller.

use crate::cli::ExtractArgs;
use crate::extract::{extract, stringify, NotFound};
use serde_json::Value;
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    NotFound(#[from] NotFound),
}

/// Apply `path` to the JSON text in `input` and return the label text.
pub fn extract_text(input: &str, path: &str) -> Result<String, ExtractError> {
    let document: Value = serde_json::from_str(input)?;
    let value = extract(&document, path)?;
    Ok(stringify(value))
}

fn read_input(args: &ExtractArgs) -> Result<String, ExtractError> {
    match &args.file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Handle `jsonpeek extract`
///
/// Prints the value on a hit. On a miss prints `N/A` and fails, so scripts
/// can tell a missing value from a literal `N/A` string.
pub fn handle_extract(args: &ExtractArgs) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(args)?;

    match extract_text(&input, &args.path) {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(ExtractError::NotFound(miss)) => {
            println!("N/A");
            Err(miss.into())
        }
        Err(e) => Err(e.into()),
    }
}

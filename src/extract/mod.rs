//! Path-based value extraction from JSON documents.
//!
//! A path is a dot-separated list of segments. All-digit segments index
//! into arrays; everything else is an object key.
//!
//! ```rust
//! use jsonpeek::extract::{extract, stringify};
//! use serde_json::json;
//!
//! let doc = json!([{"balance": 42}]);
//! let value = extract(&doc, "0.balance").unwrap();
//! assert_eq!(stringify(value), "42");
//! ```
//!
//! Numeric segments never address object keys. `{"0": 1}` with path `0`
//! is a miss, not `1`.

mod path;

pub use path::{parse_path, PathSegment};

use serde_json::Value;
use thiserror::Error;

/// A path that did not resolve against a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("path segment {segment} at position {position} did not resolve")]
pub struct NotFound {
    /// Zero-based position of the failing segment
    pub position: usize,
    /// The failing segment
    pub segment: PathSegment,
}

/// Walk `document` along `path` and return the selected value.
///
/// Stops at the first segment that does not resolve. A `null` member is a
/// successful hit.
pub fn extract<'a>(document: &'a Value, path: &str) -> Result<&'a Value, NotFound> {
    let mut current = document;

    for (position, segment) in parse_path(path).into_iter().enumerate() {
        let next = match (&segment, current) {
            (PathSegment::Index(Some(idx)), Value::Array(items)) => items.get(*idx),
            (PathSegment::Key(key), Value::Object(map)) => map.get(key),
            _ => None,
        };

        current = next.ok_or(NotFound { position, segment })?;
    }

    Ok(current)
}

/// Render an extracted value as label text.
///
/// Strings lose their quotes, `null` becomes the literal `null`, and
/// containers are rendered as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

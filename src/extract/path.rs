//! Path expression parsing.

use std::fmt;

/// One step of a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// All-digit segment, always an array index.
    ///
    /// `None` when the digits do not fit in a `usize`; such an index can
    /// never be in bounds.
    Index(Option<usize>),
    /// Any other segment, looked up as an object key.
    Key(String),
}

impl PathSegment {
    /// Classify a single raw segment.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            PathSegment::Index(raw.parse().ok())
        } else {
            PathSegment::Key(raw.to_string())
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(Some(idx)) => write!(f, "[{}]", idx),
            PathSegment::Index(None) => write!(f, "[overflow]"),
            PathSegment::Key(key) => write!(f, "{:?}", key),
        }
    }
}

/// Split a path expression into segments.
///
/// The empty path has no segments and selects the whole document.
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.').map(PathSegment::parse).collect()
}

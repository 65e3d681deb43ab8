//! # Error Types
//!
//! Parsing failures for the textual form of the shared enums.

use thiserror::Error;

/// A string did not name any variant of a shared enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    /// Which enum was being parsed (e.g. "tracking mode").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

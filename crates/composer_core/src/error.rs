//! Error types for the composer editing engine.
use thiserror::Error;

/// Top-level error type for the fallible engine boundaries.
///
/// Editing operations themselves never fail; these variants cover values that
/// arrive from outside the engine (scripts, environment, host input).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposerError {
    #[error("Invalid selection {start}..{end} for text of {len} chars")]
    InvalidSelection {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Unknown marker: {0}")]
    UnknownMarker(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

//! errors.rs - Custom error types for the histscrub-core library.
//!
//! This module defines a structured error enum for the library. Every failure
//! aborts the whole call: no partially sanitized history is ever returned, so
//! callers should treat any `ScrubError` as "do not export this data".
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// Result type for sanitization operations.
pub type Result<T> = std::result::Result<T, ScrubError>;

/// This enum represents all possible error types in the `histscrub-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrubError {
    /// A node that must be a tagged variant has no extractable tag.
    #[error("malformed entry at {path}: missing tag")]
    MalformedEntry { path: String },

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("envelope has no `history` list")]
    MissingHistory,

    #[error("failed to compile watch term '{0}': {1}")]
    InvalidPattern(String, regex::Error),

    #[error("watch term '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternTooLong(String, usize, usize),

    #[error("{0}")]
    Compilation(String),

    /// The caller-supplied substitution failed. Propagated as-is.
    #[error(transparent)]
    Substitute(#[from] anyhow::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScrubError {
    pub(crate) fn malformed_entry(path: impl Into<String>) -> Self {
        ScrubError::MalformedEntry { path: path.into() }
    }
}

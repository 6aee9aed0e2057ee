//! Common error types for VerseCast

use thiserror::Error;

/// Common result type for VerseCast operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across VerseCast surfaces
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reference text that matched neither the grammar nor a known book.
    ///
    /// Carries the offending substring; malformed grammar and unknown book
    /// designators are deliberately indistinguishable to callers.
    #[error("unrecognized verse reference: \"{input}\"")]
    ParseReference { input: String },

    /// Unknown translation identifier in a request or corpus file name
    #[error("unknown translation: {0}")]
    UnknownTranslation(String),

    /// Background media URL rejected by validation
    #[error("invalid media URL: {0}")]
    InvalidMediaUrl(String),
}

impl Error {
    /// Build a `ParseReference` error for the given offending substring
    pub fn parse_reference(input: impl Into<String>) -> Self {
        Error::ParseReference {
            input: input.into(),
        }
    }
}

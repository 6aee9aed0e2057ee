//! Error types for the control surface
//!
//! Nothing here is fatal: every error is either a rejected operation with
//! state unchanged, or a partial result.

use thiserror::Error;

/// Main error type for the operator module
#[derive(Error, Debug)]
pub enum Error {
    /// Publish requested with nothing staged; live is left unchanged
    #[error("nothing staged to publish")]
    EmptyPreview,

    /// Errors from the shared library (parsing, config, media validation)
    #[error(transparent)]
    Common(#[from] vcast_common::Error),

    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using the operator Error
pub type Result<T> = std::result::Result<T, Error>;

//! CLI error types.

use ad_claims::ClaimsError;
use ad_directory::DirectoryError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Directory error.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Claims projection error.
    #[error(transparent)]
    Claims(#[from] ClaimsError),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

//! Claims projection error types.
//!
//! Every variant maps onto an OAuth 2.0 error code so the protocol layer
//! can reject an authorization request without inspecting causes.

use ad_directory::DirectoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating a request or projecting claims.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// Redirect URI is not on the trusted host list.
    #[error("The specified redirect_uri {0} is not valid. Check the identity_server.hosts setting for valid values.")]
    InvalidClient(String),

    /// The principal could not be mapped to a directory account.
    #[error("access_denied: {0}")]
    AccessDenied(String),

    /// The directory could not be reached.
    #[error("temporarily_unavailable: {0}")]
    TemporarilyUnavailable(String),

    /// A role pattern failed to compile.
    #[error("invalid role pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// Pattern as configured.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// Invalid configuration.
    #[error("identity configuration error: {0}")]
    Configuration(String),

    /// Any other directory failure.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl ClaimsError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns the OAuth 2.0 error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidClient(_) => "invalid_client",
            Self::AccessDenied(_) => "access_denied",
            Self::TemporarilyUnavailable(_) => "temporarily_unavailable",
            Self::InvalidPattern { .. } | Self::Configuration(_) | Self::Directory(_) => {
                "server_error"
            }
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidClient(_) => 401,
            Self::AccessDenied(_) => 403,
            Self::TemporarilyUnavailable(_) => 503,
            Self::InvalidPattern { .. } | Self::Configuration(_) | Self::Directory(_) => 500,
        }
    }

    /// Checks whether the request may succeed if retried later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TemporarilyUnavailable(_))
    }

    /// Creates an error response for OAuth 2.0/OIDC.
    #[must_use]
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(self.to_string()),
        }
    }
}

/// OAuth 2.0 error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,

    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

/// Result type for claims operations.
pub type ClaimsResult<T> = Result<T, ClaimsError>;

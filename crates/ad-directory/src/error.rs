//! Directory error types.
//!
//! ## Security Note
//!
//! Error messages must not leak bind credentials. Distinguished names and
//! filters may appear; they are not secret.

use thiserror::Error;

/// Errors raised while reading, searching or modifying the directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// An object identifier was not 32 hex characters.
    #[error("malformed object identifier: {0}")]
    MalformedIdentifier(String),

    /// No object matched the lookup.
    #[error("directory object not found: {0}")]
    NotFound(String),

    /// The directory could not be reached or dropped the connection.
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    /// Service account bind was rejected.
    #[error("directory bind failed: {0}")]
    Bind(String),

    /// The server rejected a search.
    #[error("directory search failed: {0}")]
    Search(String),

    /// The server rejected a modification.
    #[error("directory modify failed: {0}")]
    Modify(String),

    /// An object was bound through a view of the wrong class.
    #[error("expected a {expected} object at {dn}, found {found}")]
    WrongEntityClass {
        /// Class the view requires.
        expected: &'static str,
        /// Class of the object found.
        found: &'static str,
        /// Distinguished name of the object.
        dn: String,
    },

    /// Invalid configuration.
    #[error("directory configuration error: {0}")]
    Configuration(String),

    /// Connection URL is not LDAPS.
    #[error("Security error: Only LDAPS is supported. URL must start with 'ldaps://'. STARTTLS and plain LDAP are not allowed.")]
    InsecureProtocol,
}

impl DirectoryError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Checks if the directory could not be reached.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Checks if this is a security-related error.
    #[must_use]
    pub const fn is_security_error(&self) -> bool {
        matches!(self, Self::InsecureProtocol | Self::Bind(_))
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categories() {
        assert!(DirectoryError::unavailable("connection refused").is_unavailable());
        assert!(DirectoryError::not_found("jdoe").is_not_found());
        assert!(DirectoryError::InsecureProtocol.is_security_error());
        assert!(DirectoryError::Bind("invalid credentials".to_string()).is_security_error());
        assert!(!DirectoryError::Search("rc=50".to_string()).is_unavailable());
    }

    #[test]
    fn wrong_class_message_names_dn() {
        let err = DirectoryError::WrongEntityClass {
            expected: "group",
            found: "user",
            dn: "CN=jdoe,DC=example,DC=com".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("group"));
        assert!(msg.contains("CN=jdoe,DC=example,DC=com"));
    }
}

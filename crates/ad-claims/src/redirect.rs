//! Redirect URI validation.

use crate::error::{ClaimsError, ClaimsResult};

/// Accepts redirect URIs that mention a trusted host.
#[derive(Debug, Clone, Default)]
pub struct RedirectValidator {
    hosts: Vec<String>,
}

impl RedirectValidator {
    /// Creates a validator for `hosts`.
    #[must_use]
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Accepts `redirect_uri` if any trusted host occurs in it, ignoring case.
    ///
    /// ## Errors
    ///
    /// [`ClaimsError::InvalidClient`] naming the URI otherwise.
    pub fn validate(&self, redirect_uri: &str) -> ClaimsResult<()> {
        let uri = redirect_uri.to_lowercase();
        if self.hosts.iter().any(|host| uri.contains(host.as_str())) {
            Ok(())
        } else {
            tracing::warn!(redirect_uri, "rejected redirect URI");
            Err(ClaimsError::InvalidClient(redirect_uri.to_string()))
        }
    }
}

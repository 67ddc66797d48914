//! The authenticated operating-system identity handed over by the
//! transport layer.

use serde::{Deserialize, Serialize};

/// Group SID carried by interactively logged-on local accounts.
pub const LOCAL_LOGON_SID: &str = "S-1-2-0";

/// A principal authenticated before claims projection starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedPrincipal {
    /// Account name, usually `DOMAIN\user`.
    pub account_name: String,
    /// Primary SID.
    pub primary_sid: String,
    /// Group SIDs.
    #[serde(default)]
    pub group_sids: Vec<String>,
}

impl AuthenticatedPrincipal {
    /// Creates a principal.
    #[must_use]
    pub fn new(account_name: impl Into<String>, primary_sid: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            primary_sid: primary_sid.into(),
            group_sids: Vec::new(),
        }
    }

    /// Adds group SIDs.
    #[must_use]
    pub fn with_group_sids<I, S>(mut self, sids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_sids.extend(sids.into_iter().map(Into::into));
        self
    }

    /// Checks for the local-logon group SID.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.group_sids.iter().any(|sid| sid == LOCAL_LOGON_SID)
    }

    /// Account name without the domain prefix.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.account_name
            .split_once('\\')
            .map_or(self.account_name.as_str(), |(_, user)| user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_strips_domain() {
        assert_eq!(AuthenticatedPrincipal::new("CORP\\jdoe", "S-1").short_name(), "jdoe");
        assert_eq!(AuthenticatedPrincipal::new("jdoe", "S-1").short_name(), "jdoe");
    }

    #[test]
    fn local_logon_detection() {
        let local = AuthenticatedPrincipal::new("WS01\\admin", "S-1-5-21-9-500")
            .with_group_sids(["S-1-1-0", LOCAL_LOGON_SID]);
        assert!(local.is_local());
        assert!(!AuthenticatedPrincipal::new("CORP\\jdoe", "S-1-5-21-1-1001").is_local());
    }
}

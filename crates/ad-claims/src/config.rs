//! Identity-provider settings.

use serde::{Deserialize, Serialize};

use crate::claims::DestinationPolicy;
use crate::error::{ClaimsError, ClaimsResult};
use crate::redirect::RedirectValidator;
use crate::roles::{RoleFilter, RolePattern};

/// What to do when an authenticated account has no directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingUserPolicy {
    /// Reject with `access_denied`.
    #[default]
    Reject,
    /// Project claims as for a local account.
    LocalFallback,
}

/// What to do when the directory cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailablePolicy {
    /// Reject with `temporarily_unavailable`.
    #[default]
    Reject,
    /// Project claims as for a local account.
    LocalFallback,
}

/// Identity-provider settings, established once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Issuer URI.
    pub server_uri: String,

    /// Trusted redirect hosts, matched as substrings.
    pub hosts: Vec<String>,

    /// Role allow-list.
    pub groups: Vec<RolePattern>,

    /// Claim destinations.
    pub destinations: DestinationPolicy,

    /// Handling of accounts missing from the directory.
    pub missing_user: MissingUserPolicy,

    /// Handling of directory outages.
    pub directory_unavailable: UnavailablePolicy,
}

impl IdentityConfig {
    /// Validates the configuration, compiling the role allow-list.
    ///
    /// ## Errors
    ///
    /// [`ClaimsError::Configuration`] for a missing issuer URI or an empty
    /// host list, [`ClaimsError::InvalidPattern`] for a bad role pattern.
    pub fn validate(&self) -> ClaimsResult<()> {
        if self.server_uri.is_empty() {
            return Err(ClaimsError::config("server_uri cannot be empty"));
        }
        if self.hosts.iter().all(|h| h.trim().is_empty()) {
            return Err(ClaimsError::config("hosts must list at least one trusted host"));
        }
        self.role_filter().map(|_| ())
    }

    /// Compiles the role allow-list.
    ///
    /// ## Errors
    ///
    /// [`ClaimsError::InvalidPattern`].
    pub fn role_filter(&self) -> ClaimsResult<RoleFilter> {
        RoleFilter::new(&self.groups)
    }

    /// Builds the redirect validator.
    #[must_use]
    pub fn redirect_validator(&self) -> RedirectValidator {
        RedirectValidator::new(&self.hosts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reject() {
        let config = IdentityConfig::default();
        assert_eq!(config.missing_user, MissingUserPolicy::Reject);
        assert_eq!(config.directory_unavailable, UnavailablePolicy::Reject);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation() {
        let mut config = IdentityConfig {
            server_uri: "https://idp.example.com/".to_string(),
            hosts: vec!["app.example.com".to_string()],
            groups: vec!["^IT-".into()],
            ..IdentityConfig::default()
        };
        assert!(config.validate().is_ok());

        config.groups.push("[".into());
        assert!(matches!(
            config.validate(),
            Err(ClaimsError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn toml_round_trip() {
        let text = r#"
            server_uri = "https://idp.example.com/"
            hosts = ["app.example.com", "localhost:5001"]
            groups = ["^IT-", { exact = "Admins" }]
            missing_user = "local_fallback"

            [destinations]
            default = ["access_token", "identity_token"]

            [destinations.overrides]
            role = ["access_token"]
        "#;
        let config: IdentityConfig = toml::from_str(text).unwrap();
        assert_eq!(config.hosts.len(), 2);
        assert_eq!(config.missing_user, MissingUserPolicy::LocalFallback);
        assert_eq!(config.directory_unavailable, UnavailablePolicy::Reject);
        assert_eq!(config.groups[1], RolePattern::Exact { exact: "Admins".to_string() });

        let back: IdentityConfig = toml::from_str(&toml::to_string(&config).unwrap()).unwrap();
        assert_eq!(back.destinations, config.destinations);
        assert_eq!(back.groups, config.groups);
    }
}

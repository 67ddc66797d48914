//! Directory connection and resolution settings.
//!
//! ## Security Requirements
//!
//! **CRITICAL**: Only LDAPS (LDAP over TLS) is supported.
//!
//! - Connection URLs MUST start with `ldaps://`
//! - STARTTLS is NOT supported (vulnerable to downgrade attacks)
//! - Plain `ldap://` is NOT supported (credentials transmitted in cleartext)

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult};
use crate::membership::{MemberKind, ParentStrategy};

/// Directory settings, established once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    // === Connection ===
    /// Server URL (MUST be ldaps://).
    pub connection_url: String,

    /// Service account DN.
    pub bind_dn: String,

    /// Service account password.
    #[serde(skip_serializing)]
    pub bind_credential: String,

    /// Whether to validate server certificates.
    pub validate_certificates: bool,

    // === Directory Structure ===
    /// Root of user lookups and member searches.
    pub base_dn: String,

    /// Root of ancestor searches. Defaults to `base_dn`.
    pub ancestor_search_base: Option<String>,

    // === Resolution ===
    /// How ancestor groups are resolved.
    pub parent_strategy: ParentStrategy,

    /// Kind recorded on ancestor results.
    pub ancestor_kind: MemberKind,

    /// Upper bound on walk depth for [`ParentStrategy::Walk`].
    pub max_walk_depth: usize,

    /// Server-side size limit per search. 0 means no limit.
    pub size_limit: i32,

    // === Connection Pool ===
    /// Maximum simultaneously open handles.
    pub pool_max_size: usize,

    /// Connect timeout.
    #[serde(with = "duration_secs")]
    pub connection_timeout: Duration,

    /// Per-operation timeout. `None` waits indefinitely.
    #[serde(with = "option_duration_secs")]
    pub operation_timeout: Option<Duration>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            connection_url: String::new(),
            bind_dn: String::new(),
            bind_credential: String::new(),
            validate_certificates: true,
            base_dn: String::new(),
            ancestor_search_base: None,
            parent_strategy: ParentStrategy::default(),
            ancestor_kind: MemberKind::Group,
            max_walk_depth: 64,
            size_limit: 0,
            pool_max_size: 10,
            connection_timeout: Duration::from_secs(5),
            operation_timeout: None,
        }
    }
}

impl DirectoryConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> DirectoryConfigBuilder {
        DirectoryConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// ## Errors
    ///
    /// Returns [`DirectoryError::InsecureProtocol`] for non-LDAPS URLs and
    /// [`DirectoryError::Configuration`] for missing fields.
    pub fn validate(&self) -> DirectoryResult<()> {
        validate_ldaps_url(&self.connection_url)?;

        if self.bind_dn.is_empty() {
            return Err(DirectoryError::config("bind_dn cannot be empty"));
        }
        if self.base_dn.is_empty() {
            return Err(DirectoryError::config("base_dn cannot be empty"));
        }
        if self.pool_max_size == 0 {
            return Err(DirectoryError::config("pool_max_size must be at least 1"));
        }
        if self.size_limit < 0 {
            return Err(DirectoryError::config("size_limit cannot be negative"));
        }
        if self.max_walk_depth == 0 {
            return Err(DirectoryError::config("max_walk_depth must be at least 1"));
        }
        Ok(())
    }

    /// Root of ancestor searches.
    #[must_use]
    pub fn ancestor_base(&self) -> &str {
        self.ancestor_search_base.as_deref().unwrap_or(&self.base_dn)
    }
}

/// Validates that a URL uses LDAPS.
fn validate_ldaps_url(url: &str) -> DirectoryResult<()> {
    if !url.to_lowercase().starts_with("ldaps://") {
        return Err(DirectoryError::InsecureProtocol);
    }
    // "ldaps://" is 8 chars
    if url.len() <= 8 {
        return Err(DirectoryError::config("Invalid LDAPS URL: missing host"));
    }
    Ok(())
}

/// Builder for [`DirectoryConfig`].
#[derive(Debug, Default)]
pub struct DirectoryConfigBuilder {
    config: DirectoryConfig,
}

impl DirectoryConfigBuilder {
    /// Sets the connection URL (must be ldaps://).
    #[must_use]
    pub fn connection_url(mut self, url: impl Into<String>) -> Self {
        self.config.connection_url = url.into();
        self
    }

    /// Sets the bind DN.
    #[must_use]
    pub fn bind_dn(mut self, dn: impl Into<String>) -> Self {
        self.config.bind_dn = dn.into();
        self
    }

    /// Sets the bind credential.
    #[must_use]
    pub fn bind_credential(mut self, credential: impl Into<String>) -> Self {
        self.config.bind_credential = credential.into();
        self
    }

    /// Sets whether to validate certificates.
    #[must_use]
    pub const fn validate_certificates(mut self, validate: bool) -> Self {
        self.config.validate_certificates = validate;
        self
    }

    /// Sets the base DN.
    #[must_use]
    pub fn base_dn(mut self, dn: impl Into<String>) -> Self {
        self.config.base_dn = dn.into();
        self
    }

    /// Sets the root of ancestor searches.
    #[must_use]
    pub fn ancestor_search_base(mut self, dn: impl Into<String>) -> Self {
        self.config.ancestor_search_base = Some(dn.into());
        self
    }

    /// Sets the ancestor resolution strategy.
    #[must_use]
    pub const fn parent_strategy(mut self, strategy: ParentStrategy) -> Self {
        self.config.parent_strategy = strategy;
        self
    }

    /// Sets the kind recorded on ancestor results.
    #[must_use]
    pub const fn ancestor_kind(mut self, kind: MemberKind) -> Self {
        self.config.ancestor_kind = kind;
        self
    }

    /// Sets the maximum walk depth.
    #[must_use]
    pub const fn max_walk_depth(mut self, depth: usize) -> Self {
        self.config.max_walk_depth = depth;
        self
    }

    /// Sets the per-search size limit.
    #[must_use]
    pub const fn size_limit(mut self, limit: i32) -> Self {
        self.config.size_limit = limit;
        self
    }

    /// Sets the maximum number of open handles.
    #[must_use]
    pub const fn pool_max_size(mut self, max: usize) -> Self {
        self.config.pool_max_size = max;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.config.connection_timeout = timeout;
        self
    }

    /// Sets the per-operation timeout.
    #[must_use]
    pub const fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.config.operation_timeout = Some(timeout);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing
    /// - Connection URL does not use LDAPS
    pub fn build(self) -> DirectoryResult<DirectoryConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

mod option_duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(d).map(|secs| secs.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> DirectoryConfigBuilder {
        DirectoryConfig::builder()
            .connection_url("ldaps://dc01.example.com:636")
            .bind_dn("CN=svc-idp,OU=Service,DC=example,DC=com")
            .bind_credential("password")
            .base_dn("DC=example,DC=com")
    }

    #[test]
    fn rejects_ldap_url() {
        let err = builder()
            .connection_url("ldap://dc01.example.com:389")
            .build()
            .unwrap_err();
        assert!(matches!(err, DirectoryError::InsecureProtocol));
    }

    #[test]
    fn rejects_missing_host() {
        let err = builder().connection_url("ldaps://").build().unwrap_err();
        assert!(matches!(err, DirectoryError::Configuration(_)));
    }

    #[test]
    fn accepts_ldaps_url() {
        let config = builder().build().unwrap();
        assert_eq!(config.ancestor_base(), "DC=example,DC=com");
        assert_eq!(config.ancestor_kind, MemberKind::Group);
        assert!(config.operation_timeout.is_none());
    }

    #[test]
    fn ancestor_base_override() {
        let config = builder()
            .ancestor_search_base("OU=Groups,DC=example,DC=com")
            .build()
            .unwrap();
        assert_eq!(config.ancestor_base(), "OU=Groups,DC=example,DC=com");
    }

    #[test]
    fn credential_is_not_serialized() {
        let config = builder().build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"connection_timeout\":5"));
    }
}

//! The directory query primitive.
//!
//! Everything above this module talks to the directory through
//! [`Directory`]; [`crate::connection::LdapDirectory`] implements it over
//! `ldap3` and [`crate::memory::InMemoryDirectory`] serves scripted results.

use serde::{Deserialize, Serialize};

use crate::entry::{DirectoryObject, Modification};
use crate::error::{DirectoryError, DirectoryResult};
use crate::filter::ANY_OBJECT;
use crate::guid::ObjectGuid;

/// Search scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchScope {
    /// Only the base object.
    Base,
    /// One level below the base.
    OneLevel,
    /// The entire subtree.
    #[default]
    Subtree,
}

impl SearchScope {
    /// Converts to ldap3 scope.
    #[must_use]
    pub fn to_ldap3(&self) -> ldap3::Scope {
        match self {
            Self::Base => ldap3::Scope::Base,
            Self::OneLevel => ldap3::Scope::OneLevel,
            Self::Subtree => ldap3::Scope::Subtree,
        }
    }
}

/// A single search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search base (a DN or `<GUID=hex>`).
    pub base: String,
    /// Scope below the base.
    pub scope: SearchScope,
    /// Filter string.
    pub filter: String,
    /// Attributes to load.
    pub attributes: Vec<String>,
}

impl SearchRequest {
    /// Subtree search under `base`.
    #[must_use]
    pub fn subtree(base: impl Into<String>, filter: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            scope: SearchScope::Subtree,
            filter: filter.into(),
            attributes: Vec::new(),
        }
    }

    /// Reads the single object at `base`.
    #[must_use]
    pub fn object(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            scope: SearchScope::Base,
            filter: ANY_OBJECT.to_string(),
            attributes: Vec::new(),
        }
    }

    /// Sets the attributes to load. An empty list loads everything.
    #[must_use]
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }
}

/// Read and write access to a directory service.
///
/// Implementations acquire and release their transport per call; no state
/// carries over between calls.
#[allow(async_fn_in_trait)]
pub trait Directory: Send + Sync {
    /// Runs a search and returns the matching objects in directory order.
    async fn search(&self, request: &SearchRequest) -> DirectoryResult<Vec<DirectoryObject>>;

    /// Applies changes to the object at `dn`.
    async fn modify(&self, dn: &str, changes: &[Modification]) -> DirectoryResult<()>;

    /// Binds to the object at a distinguished name.
    ///
    /// ## Errors
    ///
    /// [`DirectoryError::NotFound`] when nothing lives at `dn`.
    async fn read_by_dn(&self, dn: &str, attributes: &[&str]) -> DirectoryResult<DirectoryObject> {
        let request = SearchRequest::object(dn).with_attributes(attributes.iter().copied());
        self.search(&request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DirectoryError::not_found(dn))
    }

    /// Binds to the object with the given identifier.
    ///
    /// ## Errors
    ///
    /// [`DirectoryError::NotFound`] when no object has that identifier.
    async fn read_by_guid(
        &self,
        guid: &ObjectGuid,
        attributes: &[&str],
    ) -> DirectoryResult<DirectoryObject> {
        self.read_by_dn(&guid.filter_value(), attributes).await
    }
}

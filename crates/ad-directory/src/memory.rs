//! In-memory directory for tests and offline tooling.
//!
//! Base-scope reads are served from inserted objects (by DN or by
//! `<GUID=hex>`). Subtree and one-level searches are answered from scripted
//! responses keyed by filter text, so callers can assert on exactly the
//! filters they build. Every request and modification is recorded.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::client::{Directory, SearchRequest, SearchScope};
use crate::entry::{DirectoryObject, Modification};
use crate::error::{DirectoryError, DirectoryResult};

#[derive(Debug, Default)]
struct State {
    objects: Vec<DirectoryObject>,
    responses: HashMap<String, Vec<DirectoryObject>>,
    requests: Vec<SearchRequest>,
    modifications: Vec<(String, Vec<Modification>)>,
    unavailable: bool,
}

/// A scripted [`Directory`].
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: RwLock<State>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an object for base-scope reads.
    pub fn insert(&self, object: DirectoryObject) {
        self.state.write().objects.push(object);
    }

    /// Scripts the result of searches using `filter`.
    pub fn respond(&self, filter: impl Into<String>, objects: Vec<DirectoryObject>) {
        self.state.write().responses.insert(filter.into(), objects);
    }

    /// Makes every subsequent call fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unavailable = unavailable;
    }

    /// Searches issued so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.state.read().requests.clone()
    }

    /// Modifications committed so far, in order.
    #[must_use]
    pub fn modifications(&self) -> Vec<(String, Vec<Modification>)> {
        self.state.read().modifications.clone()
    }

    fn lookup(state: &State, base: &str) -> Option<DirectoryObject> {
        let by_guid = base
            .strip_prefix("<GUID=")
            .and_then(|rest| rest.strip_suffix('>'));
        state
            .objects
            .iter()
            .find(|object| match by_guid {
                Some(hex) => object
                    .guid()
                    .is_some_and(|guid| guid.to_hex().eq_ignore_ascii_case(hex)),
                None => object.dn().eq_ignore_ascii_case(base),
            })
            .cloned()
    }
}

impl Directory for InMemoryDirectory {
    async fn search(&self, request: &SearchRequest) -> DirectoryResult<Vec<DirectoryObject>> {
        let mut state = self.state.write();
        state.requests.push(request.clone());
        if state.unavailable {
            return Err(DirectoryError::unavailable("in-memory directory offline"));
        }

        let found = match request.scope {
            SearchScope::Base => Self::lookup(&state, &request.base).into_iter().collect(),
            SearchScope::OneLevel | SearchScope::Subtree => state
                .responses
                .get(&request.filter)
                .cloned()
                .unwrap_or_default(),
        };
        tracing::debug!(base = %request.base, filter = %request.filter, count = found.len(), "in-memory search");
        Ok(found)
    }

    async fn modify(&self, dn: &str, changes: &[Modification]) -> DirectoryResult<()> {
        let mut state = self.state.write();
        if state.unavailable {
            return Err(DirectoryError::unavailable("in-memory directory offline"));
        }
        state.modifications.push((dn.to_string(), changes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guid::ObjectGuid;

    #[tokio::test]
    async fn reads_by_dn_and_guid() {
        let directory = InMemoryDirectory::new();
        let guid = ObjectGuid::from_bytes([9; 16]);
        directory.insert(
            DirectoryObject::builder("CN=x,DC=example,DC=com")
                .guid(guid)
                .build(),
        );

        let by_dn = directory.read_by_dn("cn=X,dc=example,dc=com", &[]).await.unwrap();
        let by_guid = directory.read_by_guid(&guid, &[]).await.unwrap();
        assert_eq!(by_dn.dn(), by_guid.dn());
        assert_eq!(directory.requests().len(), 2);
    }

    #[tokio::test]
    async fn unscripted_search_is_empty() {
        let directory = InMemoryDirectory::new();
        let found = directory
            .search(&SearchRequest::subtree("DC=example,DC=com", "(cn=nobody)"))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn offline_directory_fails() {
        let directory = InMemoryDirectory::new();
        directory.set_unavailable(true);
        let err = directory.read_by_dn("CN=x", &[]).await.unwrap_err();
        assert!(err.is_unavailable());
        assert!(directory.modify("CN=x", &[]).await.unwrap_err().is_unavailable());
    }
}

//! LDAP transport for [`Directory`].
//!
//! ## Security Requirements
//!
//! All connections use LDAPS (TLS from connection start).
//! STARTTLS is NOT supported to prevent downgrade attacks.
//!
//! Every call acquires its own handle (connect, bind), runs one operation
//! and unbinds before returning, whether the operation succeeded or not.
//! A semaphore bounds the number of handles open at once.

use std::collections::HashSet;
use std::sync::Arc;

use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Mod, SearchEntry, SearchOptions, SearchResult};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::client::{Directory, SearchRequest};
use crate::config::DirectoryConfig;
use crate::entry::{DirectoryObject, Modification};
use crate::error::{DirectoryError, DirectoryResult};

/// Result code: noSuchObject.
const RC_NO_SUCH_OBJECT: u32 = 32;
/// Result code: invalidCredentials.
const RC_INVALID_CREDENTIALS: u32 = 49;
/// Result code: busy.
const RC_BUSY: u32 = 51;
/// Result code: unavailable.
const RC_UNAVAILABLE: u32 = 52;
/// Result code: sizeLimitExceeded.
const RC_SIZE_LIMIT_EXCEEDED: u32 = 4;

/// Directory access over LDAPS.
pub struct LdapDirectory {
    config: Arc<DirectoryConfig>,
    semaphore: Arc<Semaphore>,
}

impl LdapDirectory {
    /// Creates a directory client.
    ///
    /// ## Errors
    ///
    /// Returns the validation error if the configuration is unusable.
    pub fn new(config: Arc<DirectoryConfig>) -> DirectoryResult<Self> {
        config.validate()?;
        let permits = config.pool_max_size;
        Ok(Self {
            config,
            semaphore: Arc::new(Semaphore::new(permits)),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Connects and binds with the service account.
    async fn acquire(&self) -> DirectoryResult<DirectoryHandle> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| DirectoryError::unavailable("connection limiter closed"))?;

        let settings = LdapConnSettings::new()
            .set_conn_timeout(self.config.connection_timeout)
            .set_no_tls_verify(!self.config.validate_certificates);

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.config.connection_url)
            .await
            .map_err(|e| DirectoryError::unavailable(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!(error = %e, "LDAP connection driver error");
            }
        });

        let bound = ldap
            .simple_bind(&self.config.bind_dn, &self.config.bind_credential)
            .await
            .map_err(|e| classify(e, DirectoryError::Bind))
            .and_then(|result| {
                result
                    .success()
                    .map_err(|e| classify(e, DirectoryError::Bind))
            });
        let handle = DirectoryHandle {
            ldap,
            _permit: permit,
        };
        if let Err(e) = bound {
            handle.release().await;
            return Err(e);
        }
        Ok(handle)
    }

    fn apply_timeout(&self, ldap: &mut Ldap) {
        if let Some(timeout) = self.config.operation_timeout {
            ldap.with_timeout(timeout);
        }
    }

    async fn run_search(
        &self,
        ldap: &mut Ldap,
        request: &SearchRequest,
    ) -> DirectoryResult<Vec<DirectoryObject>> {
        self.apply_timeout(ldap);
        if self.config.size_limit > 0 {
            ldap.with_search_options(SearchOptions::new().sizelimit(self.config.size_limit));
        }

        let SearchResult(entries, result) = ldap
            .search(
                &request.base,
                request.scope.to_ldap3(),
                &request.filter,
                request.attributes.clone(),
            )
            .await
            .map_err(|e| classify(e, DirectoryError::Search))?;

        match result.rc {
            0 => {}
            RC_SIZE_LIMIT_EXCEEDED => {
                tracing::warn!(
                    base = %request.base,
                    filter = %request.filter,
                    limit = self.config.size_limit,
                    "search truncated at size limit"
                );
            }
            _ => return Err(classify_rc(result.rc, &result.text, DirectoryError::Search)),
        }

        Ok(entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(|entry| DirectoryObject::new(entry.dn, entry.attrs, entry.bin_attrs))
            .collect())
    }

    async fn run_modify(
        &self,
        ldap: &mut Ldap,
        dn: &str,
        changes: &[Modification],
    ) -> DirectoryResult<()> {
        self.apply_timeout(ldap);
        let mods = changes.iter().map(to_ldap3_mod).collect();
        ldap.modify(dn, mods)
            .await
            .map_err(|e| classify(e, DirectoryError::Modify))?
            .success()
            .map_err(|e| classify(e, DirectoryError::Modify))?;
        Ok(())
    }
}

impl Directory for LdapDirectory {
    async fn search(&self, request: &SearchRequest) -> DirectoryResult<Vec<DirectoryObject>> {
        tracing::debug!(base = %request.base, filter = %request.filter, "directory search");
        let mut handle = self.acquire().await?;
        let result = self.run_search(&mut handle.ldap, request).await;
        handle.release().await;
        result
    }

    async fn modify(&self, dn: &str, changes: &[Modification]) -> DirectoryResult<()> {
        tracing::debug!(dn = %dn, changes = changes.len(), "directory modify");
        let mut handle = self.acquire().await?;
        let result = self.run_modify(&mut handle.ldap, dn, changes).await;
        handle.release().await;
        result
    }
}

/// One bound connection, valid for a single operation.
struct DirectoryHandle {
    ldap: Ldap,
    _permit: OwnedSemaphorePermit,
}

impl DirectoryHandle {
    /// Unbinds and returns the permit.
    async fn release(mut self) {
        if let Err(e) = self.ldap.unbind().await {
            tracing::debug!(error = %e, "unbind failed");
        }
    }
}

fn to_ldap3_mod(change: &Modification) -> Mod<String> {
    let values = |v: &[String]| v.iter().cloned().collect::<HashSet<String>>();
    match change {
        Modification::Add(name, v) => Mod::Add(name.clone(), values(v)),
        Modification::Delete(name, v) => Mod::Delete(name.clone(), values(v)),
        Modification::Replace(name, v) => Mod::Replace(name.clone(), values(v)),
    }
}

/// Maps an ldap3 error onto the directory taxonomy. Server result codes
/// keep their meaning; everything at the transport level is `Unavailable`.
fn classify(err: ldap3::LdapError, operation: fn(String) -> DirectoryError) -> DirectoryError {
    match err {
        ldap3::LdapError::LdapResult { result } => classify_rc(result.rc, &result.text, operation),
        other => DirectoryError::unavailable(other.to_string()),
    }
}

fn classify_rc(rc: u32, text: &str, operation: fn(String) -> DirectoryError) -> DirectoryError {
    match rc {
        RC_NO_SUCH_OBJECT => DirectoryError::not_found(text),
        RC_INVALID_CREDENTIALS => DirectoryError::Bind(format!("invalid credentials (rc={rc})")),
        RC_BUSY | RC_UNAVAILABLE => DirectoryError::unavailable(format!("rc={rc}: {text}")),
        _ => operation(format!("rc={rc}: {text}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DirectoryConfig {
        DirectoryConfig::builder()
            .connection_url("ldaps://dc01.example.com:636")
            .bind_dn("CN=svc-idp,OU=Service,DC=example,DC=com")
            .bind_credential("password")
            .base_dn("DC=example,DC=com")
            .pool_max_size(3)
            .build()
            .unwrap()
    }

    #[test]
    fn directory_creation() {
        let directory = LdapDirectory::new(Arc::new(config())).unwrap();
        assert_eq!(directory.config().pool_max_size, 3);
        assert_eq!(directory.semaphore.available_permits(), 3);
    }

    #[test]
    fn rejects_insecure_config() {
        let mut config = config();
        config.connection_url = "ldap://dc01.example.com".to_string();
        assert!(matches!(
            LdapDirectory::new(Arc::new(config)),
            Err(DirectoryError::InsecureProtocol)
        ));
    }

    #[test]
    fn result_codes() {
        assert!(classify_rc(32, "no such object", DirectoryError::Search).is_not_found());
        assert!(classify_rc(52, "", DirectoryError::Search).is_unavailable());
        assert!(matches!(
            classify_rc(49, "", DirectoryError::Search),
            DirectoryError::Bind(_)
        ));
        assert!(matches!(
            classify_rc(50, "insufficient access", DirectoryError::Modify),
            DirectoryError::Modify(_)
        ));
    }

    #[test]
    fn modification_mapping() {
        let change = Modification::Replace("mail".to_string(), vec![]);
        match to_ldap3_mod(&change) {
            Mod::Replace(name, values) => {
                assert_eq!(name, "mail");
                assert!(values.is_empty());
            }
            _ => panic!("expected replace"),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        let mut config = config();
        config.connection_url = "ldaps://127.0.0.1:1".to_string();
        config.connection_timeout = std::time::Duration::from_secs(1);
        let directory = LdapDirectory::new(Arc::new(config)).unwrap();

        let err = directory
            .search(&SearchRequest::subtree("DC=example,DC=com", "(cn=x)"))
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(directory.semaphore.available_permits(), 3);
    }
}

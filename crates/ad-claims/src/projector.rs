//! Claims projection.
//!
//! One [`ClaimsProjector`] serves every authorization request. Each call
//! resolves the principal to a subject, then emits the claims for the
//! requested scopes in a fixed order: openid, profile, email, roles.

use std::sync::Arc;

use ad_directory::{Directory, DirectoryError, MemberOf, User};

use crate::claims::{ClaimSet, ClaimType};
use crate::config::{IdentityConfig, MissingUserPolicy, UnavailablePolicy};
use crate::error::{ClaimsError, ClaimsResult};
use crate::principal::AuthenticatedPrincipal;
use crate::redirect::RedirectValidator;
use crate::roles::RoleFilter;
use crate::scope::{Scope, ScopeSet};

/// Whom the claims describe.
#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    /// Locally logged-on account, or a fallback when the directory has no
    /// answer.
    Local,
    /// Directory account.
    Directory(Box<User>),
}

/// Turns authenticated principals into claim sets.
pub struct ClaimsProjector<D> {
    directory: Arc<D>,
    config: Arc<IdentityConfig>,
    search_base: String,
    roles: RoleFilter,
    redirects: RedirectValidator,
}

impl<D: Directory> ClaimsProjector<D> {
    /// Creates a projector searching for accounts under `search_base`.
    ///
    /// ## Errors
    ///
    /// [`ClaimsError::InvalidPattern`] if the role allow-list does not compile.
    pub fn new(
        directory: Arc<D>,
        search_base: impl Into<String>,
        config: Arc<IdentityConfig>,
    ) -> ClaimsResult<Self> {
        let roles = config.role_filter()?;
        let redirects = config.redirect_validator();
        Ok(Self {
            directory,
            config,
            search_base: search_base.into(),
            roles,
            redirects,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Validates the redirect URI, then projects claims.
    ///
    /// ## Errors
    ///
    /// `InvalidClient` for an untrusted redirect URI, otherwise as for
    /// [`project`](Self::project).
    pub async fn authorize(
        &self,
        redirect_uri: &str,
        principal: &AuthenticatedPrincipal,
        scopes: &ScopeSet,
    ) -> ClaimsResult<ClaimSet> {
        self.redirects.validate(redirect_uri)?;
        self.project(principal, scopes).await
    }

    /// Resolves the principal to a subject.
    ///
    /// ## Errors
    ///
    /// `AccessDenied` or `TemporarilyUnavailable` when the configured policy
    /// rejects a missing account or an outage; `Directory` for any other
    /// directory failure.
    pub async fn resolve_subject(&self, principal: &AuthenticatedPrincipal) -> ClaimsResult<Subject> {
        if principal.is_local() {
            return Ok(Subject::Local);
        }

        match User::find_by_logon_name(&*self.directory, &self.search_base, &principal.account_name).await {
            Ok(user) => Ok(Subject::Directory(Box::new(user))),
            Err(DirectoryError::NotFound(_)) => match self.config.missing_user {
                MissingUserPolicy::Reject => Err(ClaimsError::AccessDenied(format!(
                    "no directory account for {}",
                    principal.account_name
                ))),
                MissingUserPolicy::LocalFallback => {
                    tracing::warn!(account = %principal.account_name, "account not in directory, projecting as local");
                    Ok(Subject::Local)
                }
            },
            Err(DirectoryError::Unavailable(reason)) => match self.config.directory_unavailable {
                UnavailablePolicy::Reject => Err(ClaimsError::TemporarilyUnavailable(reason)),
                UnavailablePolicy::LocalFallback => {
                    tracing::warn!(account = %principal.account_name, %reason, "directory unavailable, projecting as local");
                    Ok(Subject::Local)
                }
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Projects claims for the requested scopes.
    ///
    /// ## Errors
    ///
    /// As for [`resolve_subject`](Self::resolve_subject).
    pub async fn project(
        &self,
        principal: &AuthenticatedPrincipal,
        scopes: &ScopeSet,
    ) -> ClaimsResult<ClaimSet> {
        let subject = self.resolve_subject(principal).await?;
        let claims = self.project_subject(principal, &subject, scopes);
        tracing::debug!(
            account = %principal.account_name,
            local = matches!(subject, Subject::Local),
            claims = claims.len(),
            "projected claims"
        );
        Ok(claims)
    }

    /// Projects claims for an already resolved subject.
    #[must_use]
    pub fn project_subject(
        &self,
        principal: &AuthenticatedPrincipal,
        subject: &Subject,
        scopes: &ScopeSet,
    ) -> ClaimSet {
        let policy = &self.config.destinations;
        let short_name = principal.short_name();
        let mut claims = ClaimSet::new();

        match subject {
            Subject::Local => {
                if scopes.contains(Scope::OpenId) {
                    claims.push(ClaimType::Subject, &principal.primary_sid, policy);
                    claims.push(ClaimType::Name, short_name, policy);
                }
                if scopes.contains(Scope::Profile) {
                    claims.push(ClaimType::AccountName, &principal.account_name, policy);
                }
                if scopes.contains(Scope::Email) {
                    claims.push(ClaimType::Email, format!("{short_name}@localhost"), policy);
                }
            }
            Subject::Directory(user) => {
                if scopes.contains(Scope::OpenId) {
                    claims.push(ClaimType::Subject, &principal.primary_sid, policy);
                    let name = user.display_name().unwrap_or_else(|| short_name.to_string());
                    claims.push(ClaimType::Name, name, policy);
                }
                if scopes.contains(Scope::Profile) {
                    claims.push(ClaimType::AccountName, &principal.account_name, policy);
                    if let Some(given) = user.first_name() {
                        claims.push(ClaimType::GivenName, given, policy);
                    }
                    if let Some(family) = user.last_name() {
                        claims.push(ClaimType::FamilyName, family, policy);
                    }
                    if let Some(phone) = user.telephone_number() {
                        claims.push(ClaimType::PhoneNumber, phone, policy);
                    }
                }
                if scopes.contains(Scope::Email) {
                    let email = user.email().unwrap_or_else(|| {
                        let local = user.username().unwrap_or_else(|| short_name.to_string());
                        format!("{local}@localhost")
                    });
                    claims.push(ClaimType::Email, email, policy);
                }
                if scopes.contains(Scope::Roles) {
                    for role in self.roles.filter(user.group_common_names()) {
                        claims.push(ClaimType::Role, role, policy);
                    }
                }
            }
        }
        claims
    }
}

//! # ad-claims
//!
//! Projects directory accounts into OIDC claims.
//!
//! Given an [`AuthenticatedPrincipal`] and the requested [`ScopeSet`], the
//! [`ClaimsProjector`] looks the account up in the directory and emits a
//! [`ClaimSet`] with per-token destinations, or rejects the request with a
//! [`ClaimsError`] that carries an OAuth error code.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod claims;
pub mod config;
pub mod error;
pub mod principal;
pub mod projector;
pub mod redirect;
pub mod roles;
pub mod scope;

pub use claims::{Claim, ClaimSet, ClaimType, Destination, DestinationPolicy};
pub use config::{IdentityConfig, MissingUserPolicy, UnavailablePolicy};
pub use error::{ClaimsError, ClaimsResult, ErrorResponse};
pub use principal::{AuthenticatedPrincipal, LOCAL_LOGON_SID};
pub use projector::{ClaimsProjector, Subject};
pub use redirect::RedirectValidator;
pub use roles::{RoleFilter, RolePattern};
pub use scope::{Scope, ScopeSet};

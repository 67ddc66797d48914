//! Requested scopes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A scope the projector understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Subject identifier and display name.
    OpenId,
    /// Account name, given name, surname and phone.
    Profile,
    /// Email address.
    Email,
    /// Allow-listed group names.
    Roles,
}

impl Scope {
    /// Wire name of the scope.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenId => "openid",
            Self::Profile => "profile",
            Self::Email => "email",
            Self::Roles => "roles",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openid" => Ok(Self::OpenId),
            "profile" => Ok(Self::Profile),
            "email" => Ok(Self::Email),
            "roles" => Ok(Self::Roles),
            other => Err(format!("unknown scope: {other}")),
        }
    }
}

/// The set of scopes on one authorization request. Unknown scopes are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSet {
    scopes: Vec<Scope>,
}

impl ScopeSet {
    /// Parses a space-separated scope string.
    #[must_use]
    pub fn parse(scope: &str) -> Self {
        Self::from_names(scope.split_whitespace())
    }

    /// Collects scopes from individual names.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scopes = Vec::new();
        for name in names {
            match name.as_ref().parse::<Scope>() {
                Ok(scope) if !scopes.contains(&scope) => scopes.push(scope),
                Ok(_) => {}
                Err(_) => tracing::debug!(scope = name.as_ref(), "ignoring unrecognised scope"),
            }
        }
        Self { scopes }
    }

    /// Checks whether `scope` was requested.
    #[must_use]
    pub fn contains(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }

    /// Checks whether no recognised scope was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Recognised scopes in request order.
    pub fn iter(&self) -> impl Iterator<Item = Scope> + '_ {
        self.scopes.iter().copied()
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<T: IntoIterator<Item = Scope>>(iter: T) -> Self {
        let mut scopes = Vec::new();
        for scope in iter {
            if !scopes.contains(&scope) {
                scopes.push(scope);
            }
        }
        Self { scopes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_unknown() {
        let scopes = ScopeSet::parse("openid  offline_access email openid");
        assert!(scopes.contains(Scope::OpenId));
        assert!(scopes.contains(Scope::Email));
        assert!(!scopes.contains(Scope::Roles));
        assert_eq!(scopes.iter().count(), 2);
    }

    #[test]
    fn empty_scope_string() {
        assert!(ScopeSet::parse("").is_empty());
        assert!(ScopeSet::parse("offline_access").is_empty());
    }

    #[test]
    fn scope_names_are_case_sensitive() {
        assert!(ScopeSet::parse("OPENID").is_empty());
    }
}

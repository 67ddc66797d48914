//! Role allow-list.
//!
//! Group common names become roles only when they match a configured
//! pattern. Patterns are case-insensitive regular expressions searched
//! anywhere in the name, so `Admin` admits both `Admins` and `SQL Admins`.
//! An exact entry admits only that name.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ClaimsError, ClaimsResult};

/// One allow-list entry as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RolePattern {
    /// Regular expression, unanchored.
    Regex(String),
    /// Exact group name.
    Exact {
        /// The name to admit.
        exact: String,
    },
}

impl RolePattern {
    fn compile(&self) -> ClaimsResult<Regex> {
        let source = match self {
            Self::Regex(pattern) => pattern.clone(),
            Self::Exact { exact } => format!("^{}$", regex::escape(exact)),
        };
        RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| ClaimsError::InvalidPattern {
                pattern: self.source().to_string(),
                reason: e.to_string(),
            })
    }

    /// Pattern text as configured.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Regex(pattern) => pattern,
            Self::Exact { exact } => exact,
        }
    }
}

impl From<&str> for RolePattern {
    fn from(pattern: &str) -> Self {
        Self::Regex(pattern.to_string())
    }
}

/// Compiled allow-list.
#[derive(Debug, Clone, Default)]
pub struct RoleFilter {
    patterns: Vec<Regex>,
}

impl RoleFilter {
    /// Compiles the allow-list.
    ///
    /// ## Errors
    ///
    /// [`ClaimsError::InvalidPattern`] for the first pattern that does not
    /// compile.
    pub fn new(patterns: &[RolePattern]) -> ClaimsResult<Self> {
        let patterns = patterns
            .iter()
            .map(RolePattern::compile)
            .collect::<ClaimsResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Checks whether `name` matches any pattern.
    #[must_use]
    pub fn admits(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }

    /// Admitted names, de-duplicated in first-seen order.
    #[must_use]
    pub fn filter<I, S>(&self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roles: Vec<String> = Vec::new();
        for candidate in candidates {
            let candidate = candidate.as_ref();
            if self.admits(candidate) && !roles.iter().any(|r| r == candidate) {
                roles.push(candidate.to_string());
            }
        }
        roles
    }
}

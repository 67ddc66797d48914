//! Claim sets and token destinations.
//!
//! A [`ClaimSet`] is assembled once per authorization request by the
//! projector and is read-only afterwards.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim type vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClaimType {
    /// Subject identifier.
    #[serde(rename = "sub")]
    Subject,
    /// Display name.
    #[serde(rename = "name")]
    Name,
    /// Account name (`DOMAIN\user`).
    #[serde(rename = "preferred_username")]
    AccountName,
    /// Given name.
    #[serde(rename = "given_name")]
    GivenName,
    /// Surname.
    #[serde(rename = "family_name")]
    FamilyName,
    /// Email address.
    #[serde(rename = "email")]
    Email,
    /// Telephone number.
    #[serde(rename = "phone_number")]
    PhoneNumber,
    /// Role (group common name).
    #[serde(rename = "role")]
    Role,
}

impl ClaimType {
    /// Claim name as it appears in a token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Subject => "sub",
            Self::Name => "name",
            Self::AccountName => "preferred_username",
            Self::GivenName => "given_name",
            Self::FamilyName => "family_name",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
            Self::Role => "role",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token a claim is delivered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// OAuth access token.
    AccessToken,
    /// OIDC identity token.
    IdentityToken,
}

impl Destination {
    /// Both tokens.
    pub const ALL: [Self; 2] = [Self::AccessToken, Self::IdentityToken];

    /// Destination name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::IdentityToken => "id_token",
        }
    }
}

/// Chooses the destinations of each claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationPolicy {
    /// Destinations of claims without an override.
    pub default: BTreeSet<Destination>,

    /// Per-type overrides.
    pub overrides: HashMap<ClaimType, BTreeSet<Destination>>,
}

impl Default for DestinationPolicy {
    fn default() -> Self {
        Self {
            default: Destination::ALL.into_iter().collect(),
            overrides: HashMap::new(),
        }
    }
}

impl DestinationPolicy {
    /// Routes `claim_type` to `destinations` only.
    #[must_use]
    pub fn with_override<I>(mut self, claim_type: ClaimType, destinations: I) -> Self
    where
        I: IntoIterator<Item = Destination>,
    {
        self.overrides
            .insert(claim_type, destinations.into_iter().collect());
        self
    }

    /// Destinations for `claim_type`.
    #[must_use]
    pub fn destinations(&self, claim_type: ClaimType) -> BTreeSet<Destination> {
        self.overrides
            .get(&claim_type)
            .unwrap_or(&self.default)
            .clone()
    }
}

/// One claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Claim type.
    pub claim_type: ClaimType,
    /// Claim value.
    pub value: String,
    /// Tokens the claim is delivered into.
    pub destinations: BTreeSet<Destination>,
}

/// Ordered claims for one authorization request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimSet {
    claims: Vec<Claim>,
}

impl ClaimSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, claim_type: ClaimType, value: impl Into<String>, policy: &DestinationPolicy) {
        self.claims.push(Claim {
            claim_type,
            value: value.into(),
            destinations: policy.destinations(claim_type),
        });
    }

    /// Claims in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter()
    }

    /// Number of claims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Checks whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Values of every claim of `claim_type`, in order.
    #[must_use]
    pub fn values_of(&self, claim_type: ClaimType) -> Vec<&str> {
        self.claims
            .iter()
            .filter(|c| c.claim_type == claim_type)
            .map(|c| c.value.as_str())
            .collect()
    }

    /// First value of `claim_type`.
    #[must_use]
    pub fn first(&self, claim_type: ClaimType) -> Option<&str> {
        self.values_of(claim_type).into_iter().next()
    }

    /// Claims delivered into `destination`.
    pub fn for_destination(&self, destination: Destination) -> impl Iterator<Item = &Claim> {
        self.claims
            .iter()
            .filter(move |c| c.destinations.contains(&destination))
    }

    /// Renders the claims delivered into `destination` as a JSON object.
    /// A type that occurs more than once becomes an array.
    #[must_use]
    pub fn to_json(&self, destination: Destination) -> Value {
        let mut map = Map::new();
        for claim in self.for_destination(destination) {
            let key = claim.claim_type.as_str();
            let value = Value::String(claim.value.clone());
            match map.get_mut(key) {
                None => {
                    map.insert(key.to_string(), value);
                }
                Some(Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            }
        }
        Value::Object(map)
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type Item = &'a Claim;
    type IntoIter = std::slice::Iter<'a, Claim>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}

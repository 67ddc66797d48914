//! Group membership resolution.
//!
//! Direct members come from three `memberOf` searches, one per entity kind.
//! Ancestors come either from a single search with the in-chain matching
//! rule or, for directories without it, from a level-by-level walk over
//! `memberOf`.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::client::{Directory, SearchRequest};
use crate::config::DirectoryConfig;
use crate::entry::{attr, DirectoryObject};
use crate::error::{DirectoryError, DirectoryResult};
use crate::filter;
use crate::guid::ObjectGuid;
use crate::views::{DirectoryView, Group};

/// Attributes loaded for membership results.
const MEMBER_ATTRIBUTES: &[&str] = &[
    attr::CN,
    attr::OBJECT_GUID,
    attr::DISTINGUISHED_NAME,
    attr::DISPLAY_NAME,
];

/// Kind of a membership entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// User account.
    User,
    /// Group.
    Group,
    /// Computer account.
    Computer,
}

impl MemberKind {
    /// `objectCategory` value searched for this kind.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::Computer => "computer",
        }
    }
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.category())
    }
}

/// How ancestor groups are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentStrategy {
    /// One search using the in-chain matching rule.
    #[default]
    MatchingRuleInChain,
    /// Follow `memberOf` one level at a time.
    Walk,
}

/// One member or ancestor of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Entity kind.
    pub kind: MemberKind,
    /// Display name.
    pub display_name: String,
    /// Distinguished name.
    pub distinguished_name: String,
    /// Object identifier.
    pub guid: ObjectGuid,
}

impl Membership {
    /// Builds an entry from a search result; `None` if it lacks an
    /// identifier or a distinguished name.
    fn from_object(kind: MemberKind, object: &DirectoryObject) -> Option<Self> {
        let Some(guid) = object.guid() else {
            tracing::warn!(dn = %object.dn(), "skipping membership entry without objectGUID");
            return None;
        };
        let distinguished_name = object.get_string(attr::DISTINGUISHED_NAME);
        if distinguished_name.is_empty() {
            tracing::warn!(dn = %object.dn(), "skipping membership entry without distinguishedName");
            return None;
        }

        let display_name = match kind {
            MemberKind::User => object
                .get_optional_string(attr::DISPLAY_NAME)
                .unwrap_or_else(|| format!("<{distinguished_name}>")),
            MemberKind::Group | MemberKind::Computer => object.common_name(),
        };

        Some(Self {
            kind,
            display_name,
            distinguished_name,
            guid,
        })
    }
}

/// Resolves members and ancestors of groups.
pub struct MembershipResolver<'a, D> {
    directory: &'a D,
    config: &'a DirectoryConfig,
}

impl<'a, D: Directory> MembershipResolver<'a, D> {
    /// Creates a resolver over `directory`.
    #[must_use]
    pub const fn new(directory: &'a D, config: &'a DirectoryConfig) -> Self {
        Self { directory, config }
    }

    /// Direct members of `group`: groups, then users, then computers.
    ///
    /// ## Errors
    ///
    /// `MalformedIdentifier` if the group has no identifier, otherwise the
    /// directory's error.
    pub async fn members(&self, group: &Group) -> DirectoryResult<Vec<Membership>> {
        let guid = group_guid(group)?;
        let mut members = Vec::new();
        for kind in [MemberKind::Group, MemberKind::User, MemberKind::Computer] {
            let request =
                SearchRequest::subtree(&self.config.base_dn, filter::direct_members(kind.category(), &guid))
                    .with_attributes(MEMBER_ATTRIBUTES.iter().copied());
            let found = self.directory.search(&request).await?;
            members.extend(found.iter().filter_map(|o| Membership::from_object(kind, o)));
        }
        tracing::debug!(group = %guid, count = members.len(), "resolved group members");
        Ok(members)
    }

    /// Every group that contains `group` at any nesting depth.
    ///
    /// ## Errors
    ///
    /// As for [`members`](Self::members).
    pub async fn parents(&self, group: &Group) -> DirectoryResult<Vec<Membership>> {
        let guid = group_guid(group)?;
        let parents = match self.config.parent_strategy {
            ParentStrategy::MatchingRuleInChain => self.parents_in_chain(&guid).await?,
            ParentStrategy::Walk => self.parents_by_walk(group).await?,
        };
        tracing::debug!(group = %guid, count = parents.len(), "resolved group ancestors");
        Ok(parents)
    }

    async fn parents_in_chain(&self, guid: &ObjectGuid) -> DirectoryResult<Vec<Membership>> {
        let request = SearchRequest::subtree(self.config.ancestor_base(), filter::transitive_parents(guid))
            .with_attributes(MEMBER_ATTRIBUTES.iter().copied());
        let found = self.directory.search(&request).await?;

        let mut seen = HashSet::new();
        Ok(found
            .iter()
            .filter_map(|o| Membership::from_object(self.config.ancestor_kind, o))
            .filter(|m| seen.insert(m.guid))
            .collect())
    }

    async fn parents_by_walk(&self, group: &Group) -> DirectoryResult<Vec<Membership>> {
        let mut attributes = MEMBER_ATTRIBUTES.to_vec();
        attributes.push(attr::MEMBER_OF);

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(group.distinguished_name().to_ascii_lowercase());

        let mut queue: VecDeque<(String, usize)> =
            group.object().get_list(attr::MEMBER_OF).into_iter().map(|dn| (dn, 1)).collect();
        let mut parents = Vec::new();

        while let Some((dn, depth)) = queue.pop_front() {
            if !visited.insert(dn.to_ascii_lowercase()) {
                continue;
            }
            if depth > self.config.max_walk_depth {
                tracing::warn!(dn = %dn, depth, "ancestor walk reached maximum depth");
                continue;
            }

            let object = match self.directory.read_by_dn(&dn, &attributes).await {
                Ok(object) => object,
                Err(DirectoryError::NotFound(_)) => {
                    tracing::warn!(dn = %dn, "memberOf names a missing object");
                    continue;
                }
                Err(e) => return Err(e),
            };

            queue.extend(object.get_list(attr::MEMBER_OF).into_iter().map(|p| (p, depth + 1)));
            if let Some(membership) = Membership::from_object(self.config.ancestor_kind, &object) {
                parents.push(membership);
            }
        }
        Ok(parents)
    }
}

fn group_guid(group: &Group) -> DirectoryResult<ObjectGuid> {
    group.guid().ok_or_else(|| {
        DirectoryError::MalformedIdentifier(format!(
            "group {} has no objectGUID",
            group.distinguished_name()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDirectory;

    const BASE: &str = "DC=example,DC=com";

    fn config(strategy: ParentStrategy) -> DirectoryConfig {
        DirectoryConfig::builder()
            .connection_url("ldaps://dc01.example.com")
            .bind_dn("CN=svc,DC=example,DC=com")
            .base_dn(BASE)
            .parent_strategy(strategy)
            .build()
            .unwrap()
    }

    fn group_object(n: u8, cn: &str, member_of: &[&str]) -> DirectoryObject {
        let dn = format!("CN={cn},OU=Groups,{BASE}");
        DirectoryObject::builder(dn.clone())
            .guid(ObjectGuid::from_bytes([n; 16]))
            .attrs("objectClass", ["top", "group"])
            .attr("cn", cn)
            .attr("distinguishedName", dn)
            .attrs("memberOf", member_of.iter().copied())
            .build()
    }

    fn user_object(n: u8, cn: &str, display: Option<&str>) -> DirectoryObject {
        let dn = format!("CN={cn},OU=Users,{BASE}");
        let mut builder = DirectoryObject::builder(dn.clone())
            .guid(ObjectGuid::from_bytes([n; 16]))
            .attr("cn", cn)
            .attr("distinguishedName", dn);
        if let Some(display) = display {
            builder = builder.attr("displayName", display);
        }
        builder.build()
    }

    fn admins() -> Group {
        Group::try_from_object(group_object(1, "Admins", &[])).unwrap()
    }

    #[tokio::test]
    async fn members_in_kind_order() {
        let directory = InMemoryDirectory::new();
        let guid = ObjectGuid::from_bytes([1; 16]);
        directory.respond(
            filter::direct_members("group", &guid),
            vec![group_object(2, "Helpdesk", &[])],
        );
        directory.respond(
            filter::direct_members("user", &guid),
            vec![user_object(3, "jdoe", Some("John Doe")), user_object(4, "svc", None)],
        );
        directory.respond(
            filter::direct_members("computer", &guid),
            vec![DirectoryObject::builder("CN=WS01,OU=Computers,DC=example,DC=com")
                .guid(ObjectGuid::from_bytes([5; 16]))
                .attr("cn", "WS01")
                .attr("distinguishedName", "CN=WS01,OU=Computers,DC=example,DC=com")
                .build()],
        );

        let config = config(ParentStrategy::default());
        let members = MembershipResolver::new(&directory, &config)
            .members(&admins())
            .await
            .unwrap();

        let kinds: Vec<MemberKind> = members.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![MemberKind::Group, MemberKind::User, MemberKind::User, MemberKind::Computer]
        );
        assert_eq!(members[0].display_name, "Helpdesk");
        assert_eq!(members[1].display_name, "John Doe");
        assert_eq!(members[2].display_name, "<CN=svc,OU=Users,DC=example,DC=com>");
        assert_eq!(members[3].display_name, "WS01");

        let requests = directory.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.base == BASE));
    }

    #[tokio::test]
    async fn members_skip_entries_without_identity() {
        let directory = InMemoryDirectory::new();
        let guid = ObjectGuid::from_bytes([1; 16]);
        directory.respond(
            filter::direct_members("user", &guid),
            vec![
                DirectoryObject::builder("CN=ghost,DC=example,DC=com")
                    .attr("cn", "ghost")
                    .build(),
                user_object(3, "jdoe", None),
            ],
        );

        let config = config(ParentStrategy::default());
        let members = MembershipResolver::new(&directory, &config)
            .members(&admins())
            .await
            .unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].guid, ObjectGuid::from_bytes([3; 16]));
    }

    #[tokio::test]
    async fn parents_use_chain_rule_and_dedup() {
        let directory = InMemoryDirectory::new();
        let guid = ObjectGuid::from_bytes([1; 16]);
        directory.respond(
            format!("(member:1.2.840.113556.1.4.1941:=<GUID={}>)", guid.to_hex()),
            vec![
                group_object(2, "IT", &[]),
                group_object(3, "Staff", &[]),
                group_object(2, "IT", &[]),
            ],
        );

        let mut config = config(ParentStrategy::MatchingRuleInChain);
        config.ancestor_search_base = Some(format!("OU=Groups,{BASE}"));
        let parents = MembershipResolver::new(&directory, &config)
            .parents(&admins())
            .await
            .unwrap();

        let names: Vec<&str> = parents.iter().map(|m| m.display_name.as_str()).collect();
        assert_eq!(names, vec!["IT", "Staff"]);
        assert!(parents.iter().all(|m| m.kind == MemberKind::Group));
        assert_eq!(directory.requests()[0].base, format!("OU=Groups,{BASE}"));
    }

    #[tokio::test]
    async fn parents_kind_is_configurable() {
        let directory = InMemoryDirectory::new();
        let guid = ObjectGuid::from_bytes([1; 16]);
        directory.respond(filter::transitive_parents(&guid), vec![group_object(2, "IT", &[])]);

        let mut config = config(ParentStrategy::MatchingRuleInChain);
        config.ancestor_kind = MemberKind::Computer;
        let parents = MembershipResolver::new(&directory, &config)
            .parents(&admins())
            .await
            .unwrap();
        assert_eq!(parents[0].kind, MemberKind::Computer);
    }

    #[tokio::test]
    async fn walk_terminates_on_cycles() {
        let it = format!("CN=IT,OU=Groups,{BASE}");
        let staff = format!("CN=Staff,OU=Groups,{BASE}");
        let admins_dn = format!("CN=Admins,OU=Groups,{BASE}");

        let directory = InMemoryDirectory::new();
        // Admins -> IT -> Staff -> Admins
        directory.insert(group_object(2, "IT", &[staff.as_str()]));
        directory.insert(group_object(3, "Staff", &[admins_dn.as_str()]));
        let admins = Group::try_from_object(group_object(1, "Admins", &[it.as_str()])).unwrap();
        directory.insert(admins.object().clone());

        let config = config(ParentStrategy::Walk);
        let parents = MembershipResolver::new(&directory, &config)
            .parents(&admins)
            .await
            .unwrap();

        let names: Vec<&str> = parents.iter().map(|m| m.display_name.as_str()).collect();
        assert_eq!(names, vec!["IT", "Staff"]);
    }

    #[tokio::test]
    async fn group_without_guid_is_rejected() {
        let directory = InMemoryDirectory::new();
        let group = Group::try_from_object(
            DirectoryObject::builder("CN=Bare,DC=example,DC=com")
                .attrs("objectClass", ["group"])
                .build(),
        )
        .unwrap();

        let config = config(ParentStrategy::default());
        let err = MembershipResolver::new(&directory, &config)
            .members(&group)
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::MalformedIdentifier(_)));
        assert!(directory.requests().is_empty());
    }
}

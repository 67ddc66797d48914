//! Groups.

use serde::{Deserialize, Serialize};

use crate::client::Directory;
use crate::entry::{attr, DirectoryObject, EntityClass};
use crate::error::DirectoryResult;
use crate::guid::ObjectGuid;

use super::{DirectoryView, MemberOf};

/// `groupType` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    /// Global scope.
    GlobalGroup,
    /// Domain-local scope.
    DomainLocalGroup,
    /// Universal scope.
    UniversalGroup,
    /// Security-enabled (otherwise a distribution group).
    SecurityGroup,
}

impl GroupType {
    const ALL: [Self; 4] = [
        Self::GlobalGroup,
        Self::DomainLocalGroup,
        Self::UniversalGroup,
        Self::SecurityGroup,
    ];

    /// Bit value of the flag.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::GlobalGroup => 0x0000_0002,
            Self::DomainLocalGroup => 0x0000_0004,
            Self::UniversalGroup => 0x0000_0008,
            Self::SecurityGroup => 0x8000_0000,
        }
    }
}

/// A group.
#[derive(Debug, Clone, PartialEq)]
pub struct Group(DirectoryObject);

impl Group {
    /// Attributes loaded when binding a group.
    pub const ATTRIBUTES: &'static [&'static str] = &[
        "cn",
        "objectGUID",
        "distinguishedName",
        "objectClass",
        "whenCreated",
        "whenChanged",
        "description",
        "info",
        "managedBy",
        "sAMAccountName",
        "groupType",
        "memberOf",
    ];

    /// Wraps an object, checking its class.
    ///
    /// ## Errors
    ///
    /// `WrongEntityClass` if the object is not a group.
    pub fn try_from_object(object: DirectoryObject) -> DirectoryResult<Self> {
        object.require_class(EntityClass::Group)?;
        Ok(Self(object))
    }

    /// Binds to the group at `dn`.
    ///
    /// ## Errors
    ///
    /// `NotFound` or `WrongEntityClass`.
    pub async fn bind<D: Directory>(directory: &D, dn: &str) -> DirectoryResult<Self> {
        Self::try_from_object(directory.read_by_dn(dn, Self::ATTRIBUTES).await?)
    }

    /// Binds to the group with identifier `guid`.
    ///
    /// ## Errors
    ///
    /// `NotFound` or `WrongEntityClass`.
    pub async fn bind_guid<D: Directory>(directory: &D, guid: &ObjectGuid) -> DirectoryResult<Self> {
        Self::try_from_object(directory.read_by_guid(guid, Self::ATTRIBUTES).await?)
    }

    /// Unwraps the underlying object.
    #[must_use]
    pub fn into_inner(self) -> DirectoryObject {
        self.0
    }

    text_accessors! {
        /// Description.
        description, set_description => "description";
        /// Notes.
        notes, set_notes => "info";
        /// DN of the managing account.
        managed_by, set_managed_by => "managedBy";
    }

    text_getters! {
        /// Pre-Windows 2000 name.
        windows2000_name => "sAMAccountName";
    }

    /// Flags set in `groupType`.
    #[must_use]
    pub fn group_type(&self) -> Vec<GroupType> {
        // groupType is a signed 32-bit value; the security bit makes it negative.
        let Some(raw) = self.0.get_optional_int("groupType") else {
            return Vec::new();
        };
        let bits = raw as u32;
        GroupType::ALL
            .into_iter()
            .filter(|flag| bits & flag.bits() != 0)
            .collect()
    }

    /// Checks whether the group is security-enabled.
    #[must_use]
    pub fn is_security_group(&self) -> bool {
        self.group_type().contains(&GroupType::SecurityGroup)
    }

    /// Stages adding `member_dn` to the group.
    pub fn add_member(&mut self, member_dn: &str) {
        self.0.add_value(attr::MEMBER, member_dn);
    }

    /// Stages removing `member_dn` from the group.
    pub fn remove_member(&mut self, member_dn: &str) {
        self.0.remove_value(attr::MEMBER, member_dn);
    }
}

impl DirectoryView for Group {
    fn object(&self) -> &DirectoryObject {
        &self.0
    }

    fn object_mut(&mut self) -> &mut DirectoryObject {
        &mut self.0
    }
}

impl MemberOf for Group {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Modification;
    use crate::memory::InMemoryDirectory;

    fn admins(group_type: &str) -> DirectoryObject {
        DirectoryObject::builder("CN=Admins,OU=Groups,DC=example,DC=com")
            .guid(ObjectGuid::from_bytes([1; 16]))
            .attrs("objectClass", ["top", "group"])
            .attr("cn", "Admins")
            .attr("sAMAccountName", "Admins")
            .attr("groupType", group_type)
            .build()
    }

    #[test]
    fn group_type_flags() {
        // Global security group.
        let group = Group::try_from_object(admins("-2147483646")).unwrap();
        assert_eq!(
            group.group_type(),
            vec![GroupType::GlobalGroup, GroupType::SecurityGroup]
        );
        assert!(group.is_security_group());

        let distribution = Group::try_from_object(admins("8")).unwrap();
        assert_eq!(distribution.group_type(), vec![GroupType::UniversalGroup]);
        assert!(!distribution.is_security_group());
    }

    #[test]
    fn accessors() {
        let group = Group::try_from_object(admins("2")).unwrap();
        assert_eq!(group.windows2000_name().as_deref(), Some("Admins"));
        assert_eq!(group.description(), None);
        assert_eq!(group.name(), "Admins");
    }

    #[tokio::test]
    async fn membership_changes_are_committed_on_save() {
        let directory = InMemoryDirectory::new();
        let mut group = Group::try_from_object(admins("2")).unwrap();
        group.add_member("CN=John Doe,OU=Users,DC=example,DC=com");
        group.remove_member("CN=Jane Roe,OU=Users,DC=example,DC=com");

        group.object_mut().save(&directory).await.unwrap();

        let modifications = directory.modifications();
        assert_eq!(modifications.len(), 1);
        let (dn, changes) = &modifications[0];
        assert_eq!(dn, "CN=Admins,OU=Groups,DC=example,DC=com");
        assert_eq!(
            changes[0],
            Modification::Add(
                "member".to_string(),
                vec!["CN=John Doe,OU=Users,DC=example,DC=com".to_string()]
            )
        );
        assert!(matches!(changes[1], Modification::Delete(..)));
        assert!(group.object().pending_changes().is_empty());
    }

    #[tokio::test]
    async fn bind_by_guid() {
        let directory = InMemoryDirectory::new();
        directory.insert(admins("2"));

        let group = Group::bind_guid(&directory, &ObjectGuid::from_bytes([1; 16]))
            .await
            .unwrap();
        assert_eq!(group.distinguished_name(), "CN=Admins,OU=Groups,DC=example,DC=com");
    }
}

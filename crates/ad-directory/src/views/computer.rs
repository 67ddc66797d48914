//! Computer accounts.

use crate::client::Directory;
use crate::entry::{DirectoryObject, EntityClass};
use crate::error::DirectoryResult;
use crate::guid::ObjectGuid;

use super::{has_account_flag, AccountControl, DirectoryView, MemberOf};

/// A computer account.
#[derive(Debug, Clone, PartialEq)]
pub struct Computer(DirectoryObject);

impl Computer {
    /// Attributes loaded when binding a computer.
    pub const ATTRIBUTES: &'static [&'static str] = &[
        "cn",
        "objectGUID",
        "distinguishedName",
        "objectClass",
        "whenCreated",
        "whenChanged",
        "description",
        "dNSHostName",
        "userAccountControl",
        "memberOf",
    ];

    /// Wraps an object, checking its class.
    ///
    /// ## Errors
    ///
    /// `WrongEntityClass` if the object is not a computer.
    pub fn try_from_object(object: DirectoryObject) -> DirectoryResult<Self> {
        object.require_class(EntityClass::Computer)?;
        Ok(Self(object))
    }

    /// Binds to the computer at `dn`.
    ///
    /// ## Errors
    ///
    /// `NotFound` or `WrongEntityClass`.
    pub async fn bind<D: Directory>(directory: &D, dn: &str) -> DirectoryResult<Self> {
        Self::try_from_object(directory.read_by_dn(dn, Self::ATTRIBUTES).await?)
    }

    /// Binds to the computer with identifier `guid`.
    ///
    /// ## Errors
    ///
    /// `NotFound` or `WrongEntityClass`.
    pub async fn bind_guid<D: Directory>(directory: &D, guid: &ObjectGuid) -> DirectoryResult<Self> {
        Self::try_from_object(directory.read_by_guid(guid, Self::ATTRIBUTES).await?)
    }

    text_accessors! {
        /// Description.
        description, set_description => "description";
    }

    text_getters! {
        /// Fully qualified host name.
        dns_name => "dNSHostName";
    }

    /// Tests an account-control flag.
    #[must_use]
    pub fn has_flag(&self, flag: AccountControl) -> bool {
        has_account_flag(&self.0, flag)
    }
}

impl DirectoryView for Computer {
    fn object(&self) -> &DirectoryObject {
        &self.0
    }

    fn object_mut(&mut self) -> &mut DirectoryObject {
        &mut self.0
    }
}

impl MemberOf for Computer {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workstation() {
        let object = DirectoryObject::builder("CN=WS01,OU=Computers,DC=example,DC=com")
            .attrs("objectClass", ["top", "person", "user", "computer"])
            .attr("dNSHostName", "ws01.example.com")
            .attr("userAccountControl", "4096")
            .attrs("memberOf", ["CN=Domain Computers,CN=Users,DC=example,DC=com"])
            .build();
        let computer = Computer::try_from_object(object).unwrap();

        assert_eq!(computer.dns_name().as_deref(), Some("ws01.example.com"));
        assert!(computer.has_flag(AccountControl::WorkstationTrustAccount));
        assert!(!computer.has_flag(AccountControl::ServerTrustAccount));
        assert_eq!(computer.group_common_names(), vec!["Domain Computers", "Users"]);
    }
}

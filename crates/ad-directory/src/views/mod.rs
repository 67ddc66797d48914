//! Typed views over [`DirectoryObject`].
//!
//! Views are thin newtypes. Shared behaviour comes from two capability
//! traits: [`DirectoryView`] for identity and raw attribute access, and
//! [`MemberOf`] for objects that carry `memberOf`.

/// Generates optional text getters for single-valued attributes.
macro_rules! text_getters {
    ($( $(#[$meta:meta])* $getter:ident => $name:literal; )*) => {
        $(
            $(#[$meta])*
            #[must_use]
            pub fn $getter(&self) -> Option<String> {
                self.0.get_optional_string($name)
            }
        )*
    };
}

/// Generates getter/setter pairs; setting an empty value clears the attribute.
macro_rules! text_accessors {
    ($( $(#[$meta:meta])* $getter:ident, $setter:ident => $name:literal; )*) => {
        $(
            $(#[$meta])*
            #[must_use]
            pub fn $getter(&self) -> Option<String> {
                self.0.get_optional_string($name)
            }

            #[doc = concat!("Stages a new `", $name, "` value.")]
            pub fn $setter(&mut self, value: &str) {
                self.0.set_string($name, value);
            }
        )*
    };
}

mod computer;
mod group;
mod printer;
mod user;

pub use computer::Computer;
pub use group::{Group, GroupType};
pub use printer::Printer;
pub use user::User;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{attr, DirectoryObject, EntityClass};
use crate::guid::ObjectGuid;

/// Identity and attribute access shared by every view.
pub trait DirectoryView {
    /// The wrapped object.
    fn object(&self) -> &DirectoryObject;

    /// Mutable access for staged writes.
    fn object_mut(&mut self) -> &mut DirectoryObject;

    /// Object identifier.
    fn guid(&self) -> Option<ObjectGuid> {
        self.object().guid()
    }

    /// Distinguished name.
    fn distinguished_name(&self) -> String {
        self.object().distinguished_name()
    }

    /// Common name.
    fn name(&self) -> String {
        self.object().common_name()
    }

    /// Entity class.
    fn entity_class(&self) -> EntityClass {
        self.object().entity_class()
    }

    /// Creation time.
    fn when_created(&self) -> Option<DateTime<Utc>> {
        self.object().when_created()
    }

    /// Last change time.
    fn when_changed(&self) -> Option<DateTime<Utc>> {
        self.object().when_changed()
    }
}

/// Objects that list the groups they belong to.
pub trait MemberOf: DirectoryView {
    /// Raw `memberOf` values (group distinguished names).
    fn groups(&self) -> Vec<String> {
        self.object().get_list(attr::MEMBER_OF)
    }

    /// Common names of the groups in [`groups`](Self::groups).
    fn group_common_names(&self) -> Vec<String> {
        self.groups()
            .iter()
            .flat_map(|dn| common_names(dn))
            .collect()
    }
}

/// Extracts every `CN=` component of a distinguished name.
#[must_use]
pub fn common_names(dn: &str) -> Vec<String> {
    dn.split(',')
        .filter_map(|segment| segment.strip_prefix("CN="))
        .map(String::from)
        .collect()
}

/// `userAccountControl` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum AccountControl {
    /// Logon script runs.
    Script = 0x0001,
    /// Account is disabled.
    AccountDisable = 0x0002,
    /// Home directory required.
    HomedirRequired = 0x0008,
    /// Account is locked out.
    Lockout = 0x0010,
    /// No password required.
    PasswdNotreqd = 0x0020,
    /// User cannot change password.
    PasswdCantChange = 0x0040,
    /// Reversible password encryption.
    EncryptedTextPwdAllowed = 0x0080,
    /// Local account for a user in another domain.
    TempDuplicateAccount = 0x0100,
    /// Regular user account.
    NormalAccount = 0x0200,
    /// Trust account for a trusting domain.
    InterdomainTrustAccount = 0x0800,
    /// Workstation or member server.
    WorkstationTrustAccount = 0x1000,
    /// Domain controller.
    ServerTrustAccount = 0x2000,
    /// Password never expires.
    DontExpirePassword = 0x0001_0000,
    /// MNS logon account.
    MnsLogonAccount = 0x0002_0000,
    /// Smart card required for logon.
    SmartcardRequired = 0x0004_0000,
    /// Trusted for Kerberos delegation.
    TrustedForDelegation = 0x0008_0000,
    /// Credentials are never delegated.
    NotDelegated = 0x0010_0000,
    /// DES keys only.
    UseDesKeyOnly = 0x0020_0000,
    /// Kerberos pre-authentication not required.
    DontReqPreauth = 0x0040_0000,
    /// Password has expired.
    PasswordExpired = 0x0080_0000,
    /// Trusted to authenticate for delegation.
    TrustedToAuthForDelegation = 0x0100_0000,
}

impl AccountControl {
    /// Bit value of the flag.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

/// Tests an account-control flag on `object`; false when the attribute is absent.
pub(crate) fn has_account_flag(object: &DirectoryObject, flag: AccountControl) -> bool {
    object
        .get_optional_int(attr::USER_ACCOUNT_CONTROL)
        .is_some_and(|value| value & i64::from(flag.bits()) != 0)
}

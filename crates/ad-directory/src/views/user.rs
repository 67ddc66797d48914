//! User accounts.

use crate::client::{Directory, SearchRequest};
use crate::entry::{DirectoryObject, EntityClass};
use crate::error::{DirectoryError, DirectoryResult};
use crate::filter;
use crate::guid::ObjectGuid;

use super::{has_account_flag, AccountControl, DirectoryView, MemberOf};

/// A user account.
#[derive(Debug, Clone, PartialEq)]
pub struct User(DirectoryObject);

impl User {
    /// Attributes loaded when binding a user.
    pub const ATTRIBUTES: &'static [&'static str] = &[
        "cn",
        "objectGUID",
        "distinguishedName",
        "objectClass",
        "whenCreated",
        "whenChanged",
        "displayName",
        "sAMAccountName",
        "mail",
        "givenName",
        "sn",
        "initials",
        "description",
        "physicalDeliveryOfficeName",
        "telephoneNumber",
        "wWWHomePage",
        "street",
        "postOfficeBox",
        "l",
        "st",
        "postalCode",
        "co",
        "homePhone",
        "pager",
        "mobile",
        "facsimileTelephoneNumber",
        "ipPhone",
        "info",
        "title",
        "department",
        "company",
        "employeeID",
        "employeeNumber",
        "scriptPath",
        "homeDirectory",
        "homeMTA",
        "profilePath",
        "memberOf",
        "userAccountControl",
    ];

    /// Wraps an object, checking its class.
    ///
    /// ## Errors
    ///
    /// [`DirectoryError::WrongEntityClass`] if the object is not a user.
    pub fn try_from_object(object: DirectoryObject) -> DirectoryResult<Self> {
        object.require_class(EntityClass::User)?;
        Ok(Self(object))
    }

    /// Binds to the user at `dn`.
    ///
    /// ## Errors
    ///
    /// `NotFound` if nothing lives at `dn`, `WrongEntityClass` if it is not
    /// a user.
    pub async fn bind<D: Directory>(directory: &D, dn: &str) -> DirectoryResult<Self> {
        Self::try_from_object(directory.read_by_dn(dn, Self::ATTRIBUTES).await?)
    }

    /// Binds to the user with identifier `guid`.
    ///
    /// ## Errors
    ///
    /// As for [`bind`](Self::bind).
    pub async fn bind_guid<D: Directory>(directory: &D, guid: &ObjectGuid) -> DirectoryResult<Self> {
        Self::try_from_object(directory.read_by_guid(guid, Self::ATTRIBUTES).await?)
    }

    /// Finds the account for a logon name such as `CORP\jdoe`.
    ///
    /// Any domain prefix is stripped and the remainder is escaped before it
    /// reaches the filter.
    ///
    /// ## Errors
    ///
    /// [`DirectoryError::NotFound`] when no account has that logon name.
    pub async fn find_by_logon_name<D: Directory>(
        directory: &D,
        base_dn: &str,
        logon_name: &str,
    ) -> DirectoryResult<Self> {
        let account = strip_domain(logon_name);
        if account.trim().is_empty() {
            return Err(DirectoryError::not_found(logon_name));
        }

        let request = SearchRequest::subtree(base_dn, filter::user_by_logon_name(account))
            .with_attributes(Self::ATTRIBUTES.iter().copied());
        let mut matches = directory.search(&request).await?;
        if matches.len() > 1 {
            tracing::warn!(
                logon_name = account,
                count = matches.len(),
                "logon name matched several accounts, using the first"
            );
        }
        if matches.is_empty() {
            return Err(DirectoryError::not_found(logon_name));
        }
        Ok(Self(matches.swap_remove(0)))
    }

    /// Unwraps the underlying object.
    #[must_use]
    pub fn into_inner(self) -> DirectoryObject {
        self.0
    }

    /// Tests an account-control flag.
    #[must_use]
    pub fn has_flag(&self, flag: AccountControl) -> bool {
        has_account_flag(&self.0, flag)
    }

    /// Checks whether the account is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.has_flag(AccountControl::AccountDisable)
    }

    // General tab
    text_accessors! {
        /// Given name.
        first_name, set_first_name => "givenName";
        /// Surname.
        last_name, set_last_name => "sn";
        /// Initials.
        initials, set_initials => "initials";
        /// Display name.
        display_name, set_display_name => "displayName";
        /// Description.
        description, set_description => "description";
        /// Office location.
        office, set_office => "physicalDeliveryOfficeName";
        /// Telephone number.
        telephone_number, set_telephone_number => "telephoneNumber";
        /// Email address.
        email, set_email => "mail";
        /// Web page.
        web_page, set_web_page => "wWWHomePage";
    }

    // Address tab
    text_accessors! {
        /// Street address.
        street, set_street => "street";
        /// PO box.
        po_box, set_po_box => "postOfficeBox";
        /// City.
        city, set_city => "l";
        /// Province or state.
        province, set_province => "st";
        /// Postal code.
        postal_code, set_postal_code => "postalCode";
        /// Country.
        country, set_country => "co";
    }

    // Telephones tab
    text_accessors! {
        /// Home phone.
        home_phone, set_home_phone => "homePhone";
        /// Pager.
        pager, set_pager => "pager";
        /// Mobile phone.
        mobile_phone, set_mobile_phone => "mobile";
        /// Fax number.
        fax_number, set_fax_number => "facsimileTelephoneNumber";
        /// IP phone.
        ip_phone, set_ip_phone => "ipPhone";
        /// Notes.
        notes, set_notes => "info";
    }

    // Organization tab
    text_accessors! {
        /// Job title.
        title, set_title => "title";
        /// Department.
        department, set_department => "department";
        /// Company.
        company, set_company => "company";
        /// Employee ID.
        employee_id, set_employee_id => "employeeID";
        /// Employee number.
        employee_number, set_employee_number => "employeeNumber";
        /// Logon script path.
        logon_script, set_logon_script => "scriptPath";
        /// Home directory.
        home_directory, set_home_directory => "homeDirectory";
    }

    text_getters! {
        /// Logon name (`sAMAccountName`).
        username => "sAMAccountName";
        /// Home message transfer agent.
        exchange_server_group => "homeMTA";
        /// Roaming profile path.
        profile_path => "profilePath";
    }
}

impl DirectoryView for User {
    fn object(&self) -> &DirectoryObject {
        &self.0
    }

    fn object_mut(&mut self) -> &mut DirectoryObject {
        &mut self.0
    }
}

impl MemberOf for User {}

/// Drops a leading `DOMAIN\` from a logon name.
fn strip_domain(logon_name: &str) -> &str {
    logon_name
        .split_once('\\')
        .map_or(logon_name, |(_, account)| account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDirectory;

    fn jdoe() -> DirectoryObject {
        DirectoryObject::builder("CN=John Doe,OU=Users,DC=example,DC=com")
            .guid(ObjectGuid::from_bytes([7; 16]))
            .attrs("objectClass", ["top", "person", "organizationalPerson", "user"])
            .attr("cn", "John Doe")
            .attr("sAMAccountName", "jdoe")
            .attr("displayName", "Doe, John")
            .attr("givenName", "John")
            .attrs(
                "memberOf",
                [
                    "CN=Admins,OU=Groups,DC=example,DC=com",
                    "CN=Finance Team,OU=Groups,DC=example,DC=com",
                ],
            )
            .attr("userAccountControl", "66048")
            .build()
    }

    #[test]
    fn strip_domain_prefix() {
        assert_eq!(strip_domain("CORP\\jdoe"), "jdoe");
        assert_eq!(strip_domain("jdoe"), "jdoe");
    }

    #[test]
    fn typed_accessors() {
        let user = User::try_from_object(jdoe()).unwrap();
        assert_eq!(user.username().as_deref(), Some("jdoe"));
        assert_eq!(user.first_name().as_deref(), Some("John"));
        assert_eq!(user.email(), None);
        assert_eq!(user.name(), "John Doe");
        assert_eq!(user.group_common_names(), vec!["Admins", "Finance Team"]);
        assert!(user.has_flag(AccountControl::DontExpirePassword));
        assert!(user.has_flag(AccountControl::NormalAccount));
        assert!(!user.is_disabled());
    }

    #[test]
    fn setters_stage_changes() {
        let mut user = User::try_from_object(jdoe()).unwrap();
        user.set_telephone_number("+1 555 0100");
        user.set_first_name("");
        assert_eq!(user.telephone_number().as_deref(), Some("+1 555 0100"));
        assert_eq!(user.first_name(), None);
        assert_eq!(user.object().pending_changes().len(), 2);
    }

    #[tokio::test]
    async fn find_by_logon_name_escapes_and_strips() {
        let directory = InMemoryDirectory::new();
        directory.respond(
            "(&(objectClass=user)(sAMAccountName=jdoe))",
            vec![jdoe()],
        );

        let user = User::find_by_logon_name(&directory, "DC=example,DC=com", "CORP\\jdoe")
            .await
            .unwrap();
        assert_eq!(user.display_name().as_deref(), Some("Doe, John"));

        let issued = directory.requests();
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].base, "DC=example,DC=com");
    }

    #[tokio::test]
    async fn find_by_logon_name_not_found() {
        let directory = InMemoryDirectory::new();
        let err = User::find_by_logon_name(&directory, "DC=example,DC=com", "CORP\\ghost")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn bind_rejects_wrong_class() {
        let directory = InMemoryDirectory::new();
        let group = DirectoryObject::builder("CN=Admins,OU=Groups,DC=example,DC=com")
            .attrs("objectClass", ["top", "group"])
            .build();
        directory.insert(group);

        let err = User::bind(&directory, "CN=Admins,OU=Groups,DC=example,DC=com")
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::WrongEntityClass { .. }));
    }
}

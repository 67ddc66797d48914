//! Directory objects and typed attribute access.
//!
//! A [`DirectoryObject`] is an attribute bag bound to one existing entry.
//! Reads never fail: a missing or mistyped attribute yields an empty
//! string, an empty list or `None`. Writes are applied to the local copy
//! and staged until [`DirectoryObject::save`] commits them.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::Directory;
use crate::error::{DirectoryError, DirectoryResult};
use crate::guid::ObjectGuid;

/// Attribute names used across the crate.
pub mod attr {
    /// Common name.
    pub const CN: &str = "cn";
    /// Object identifier.
    pub const OBJECT_GUID: &str = "objectGUID";
    /// Distinguished name.
    pub const DISTINGUISHED_NAME: &str = "distinguishedName";
    /// Object class chain.
    pub const OBJECT_CLASS: &str = "objectClass";
    /// Creation timestamp.
    pub const WHEN_CREATED: &str = "whenCreated";
    /// Last change timestamp.
    pub const WHEN_CHANGED: &str = "whenChanged";
    /// Display name.
    pub const DISPLAY_NAME: &str = "displayName";
    /// Pre-Windows 2000 logon name.
    pub const SAM_ACCOUNT_NAME: &str = "sAMAccountName";
    /// Email address.
    pub const MAIL: &str = "mail";
    /// Given name.
    pub const GIVEN_NAME: &str = "givenName";
    /// Surname.
    pub const SN: &str = "sn";
    /// Telephone number.
    pub const TELEPHONE_NUMBER: &str = "telephoneNumber";
    /// Groups the object belongs to.
    pub const MEMBER_OF: &str = "memberOf";
    /// Members of a group.
    pub const MEMBER: &str = "member";
    /// Account control bitmask.
    pub const USER_ACCOUNT_CONTROL: &str = "userAccountControl";
    /// Description.
    pub const DESCRIPTION: &str = "description";
}

/// Kind of entity an object represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityClass {
    /// User account.
    User,
    /// Group.
    Group,
    /// Computer account.
    Computer,
    /// Print queue.
    Printer,
    /// Anything else.
    Other,
}

impl EntityClass {
    /// Derives the class from an `objectClass` value list.
    ///
    /// Computer accounts also carry the `user` class, so `computer` is
    /// checked first.
    #[must_use]
    pub fn from_object_classes<S: AsRef<str>>(classes: &[S]) -> Self {
        let has = |name: &str| classes.iter().any(|c| c.as_ref().eq_ignore_ascii_case(name));
        if has("computer") {
            Self::Computer
        } else if has("printQueue") {
            Self::Printer
        } else if has("group") {
            Self::Group
        } else if has("user") {
            Self::User
        } else {
            Self::Other
        }
    }

    /// Lowercase name of the class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::Computer => "computer",
            Self::Printer => "printer",
            Self::Other => "other",
        }
    }
}

/// A staged attribute change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modification {
    /// Add values to an attribute.
    Add(String, Vec<String>),
    /// Remove specific values from an attribute.
    Delete(String, Vec<String>),
    /// Replace all values; an empty list clears the attribute.
    Replace(String, Vec<String>),
}

impl Modification {
    /// Attribute the change applies to.
    #[must_use]
    pub fn attribute(&self) -> &str {
        match self {
            Self::Add(name, _) | Self::Delete(name, _) | Self::Replace(name, _) => name,
        }
    }
}

/// One directory entry and its attributes.
///
/// Attribute names are matched case-insensitively, as the directory does.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryObject {
    dn: String,
    attrs: HashMap<String, Vec<String>>,
    bin_attrs: HashMap<String, Vec<Vec<u8>>>,
    pending: Vec<Modification>,
}

impl DirectoryObject {
    /// Builds an object from a search result.
    #[must_use]
    pub fn new(
        dn: impl Into<String>,
        attrs: HashMap<String, Vec<String>>,
        bin_attrs: HashMap<String, Vec<Vec<u8>>>,
    ) -> Self {
        Self {
            dn: dn.into(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
            bin_attrs: bin_attrs
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
            pending: Vec::new(),
        }
    }

    /// Starts an empty object at `dn`; used to assemble fixtures and results.
    #[must_use]
    pub fn builder(dn: impl Into<String>) -> DirectoryObjectBuilder {
        DirectoryObjectBuilder {
            object: Self::new(dn, HashMap::new(), HashMap::new()),
        }
    }

    /// Distinguished name the object is bound to.
    #[must_use]
    pub fn dn(&self) -> &str {
        &self.dn
    }

    /// The object identifier, if it was loaded.
    ///
    /// A GUID whose bytes happen to be valid UTF-8 arrives as text, so both
    /// maps are consulted.
    #[must_use]
    pub fn guid(&self) -> Option<ObjectGuid> {
        if let Some(bytes) = self.get_binary(attr::OBJECT_GUID) {
            return ObjectGuid::from_slice(bytes).ok();
        }
        self.text_values(attr::OBJECT_GUID)
            .and_then(|v| v.first())
            .and_then(|s| ObjectGuid::from_slice(s.as_bytes()).ok())
    }

    /// Common name.
    #[must_use]
    pub fn common_name(&self) -> String {
        self.get_string(attr::CN)
    }

    /// Distinguished name as stored in the attribute, falling back to the
    /// entry DN.
    #[must_use]
    pub fn distinguished_name(&self) -> String {
        let stored = self.get_string(attr::DISTINGUISHED_NAME);
        if stored.is_empty() {
            self.dn.clone()
        } else {
            stored
        }
    }

    /// Entity class derived from `objectClass`.
    #[must_use]
    pub fn entity_class(&self) -> EntityClass {
        EntityClass::from_object_classes(&self.get_list(attr::OBJECT_CLASS))
    }

    /// Creation time (not replicated; depends on the queried controller).
    #[must_use]
    pub fn when_created(&self) -> Option<DateTime<Utc>> {
        parse_generalized_time(&self.get_string(attr::WHEN_CREATED))
    }

    /// Last change time, if recorded.
    #[must_use]
    pub fn when_changed(&self) -> Option<DateTime<Utc>> {
        parse_generalized_time(&self.get_string(attr::WHEN_CHANGED))
    }

    /// Names of all loaded attributes (lowercased).
    #[must_use]
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .attrs
            .keys()
            .chain(self.bin_attrs.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Checks whether the attribute has any value.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.text_values(name).is_some_and(|v| !v.is_empty())
            || self.get_binary(name).is_some()
    }

    fn text_values(&self, name: &str) -> Option<&Vec<String>> {
        self.attrs.get(&name.to_ascii_lowercase())
    }

    /// Single-valued text attribute; empty if absent, multi-valued or binary.
    #[must_use]
    pub fn get_string(&self, name: &str) -> String {
        match self.text_values(name).map(Vec::as_slice) {
            Some([single]) => single.clone(),
            _ => String::new(),
        }
    }

    /// Single-valued text attribute as an option; `None` when
    /// [`get_string`](Self::get_string) would be empty.
    #[must_use]
    pub fn get_optional_string(&self, name: &str) -> Option<String> {
        Some(self.get_string(name)).filter(|s| !s.is_empty())
    }

    /// All text values in directory order.
    #[must_use]
    pub fn get_list(&self, name: &str) -> Vec<String> {
        self.text_values(name).cloned().unwrap_or_default()
    }

    /// Integer attribute; `None` if absent or not an integer.
    #[must_use]
    pub fn get_optional_int(&self, name: &str) -> Option<i64> {
        let value = self.get_string(name);
        if value.is_empty() {
            return None;
        }
        match value.trim().parse() {
            Ok(n) => Some(n),
            Err(_) => {
                tracing::debug!(dn = %self.dn, attribute = name, "attribute is not an integer");
                None
            }
        }
    }

    /// Boolean attribute in LDAP `TRUE`/`FALSE` syntax.
    #[must_use]
    pub fn get_optional_bool(&self, name: &str) -> Option<bool> {
        let value = self.get_string(name);
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    /// First binary value.
    #[must_use]
    pub fn get_binary(&self, name: &str) -> Option<&[u8]> {
        self.bin_attrs
            .get(&name.to_ascii_lowercase())
            .and_then(|v| v.first())
            .map(Vec::as_slice)
    }

    // === Staged writes ===

    /// Replaces all values of an attribute. An empty list clears it.
    pub fn set(&mut self, name: &str, values: Vec<String>) {
        let key = name.to_ascii_lowercase();
        if values.is_empty() {
            self.attrs.remove(&key);
        } else {
            self.attrs.insert(key, values.clone());
        }
        self.pending.push(Modification::Replace(name.to_string(), values));
    }

    /// Sets a single-valued attribute; an empty value clears it.
    pub fn set_string(&mut self, name: &str, value: &str) {
        let values = if value.is_empty() {
            Vec::new()
        } else {
            vec![value.to_string()]
        };
        self.set(name, values);
    }

    /// Adds one value to a multi-valued attribute.
    pub fn add_value(&mut self, name: &str, value: &str) {
        self.attrs
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.to_string());
        self.pending
            .push(Modification::Add(name.to_string(), vec![value.to_string()]));
    }

    /// Removes one value from a multi-valued attribute.
    pub fn remove_value(&mut self, name: &str, value: &str) {
        let key = name.to_ascii_lowercase();
        if let Some(values) = self.attrs.get_mut(&key) {
            values.retain(|v| v != value);
            if values.is_empty() {
                self.attrs.remove(&key);
            }
        }
        self.pending
            .push(Modification::Delete(name.to_string(), vec![value.to_string()]));
    }

    /// Clears an attribute.
    pub fn clear(&mut self, name: &str) {
        self.set(name, Vec::new());
    }

    /// Changes not yet committed.
    #[must_use]
    pub fn pending_changes(&self) -> &[Modification] {
        &self.pending
    }

    /// Commits staged changes. Nothing is sent when there are none.
    ///
    /// ## Errors
    ///
    /// Returns the directory's error; staged changes are kept so the save
    /// can be retried.
    pub async fn save<D: Directory>(&mut self, directory: &D) -> DirectoryResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        directory.modify(&self.dn, &self.pending).await?;
        tracing::debug!(dn = %self.dn, changes = self.pending.len(), "committed directory changes");
        self.pending.clear();
        Ok(())
    }

    /// Fails unless the object is of `expected` class.
    pub(crate) fn require_class(&self, expected: EntityClass) -> DirectoryResult<()> {
        let found = self.entity_class();
        if found == expected {
            Ok(())
        } else {
            Err(DirectoryError::WrongEntityClass {
                expected: expected.as_str(),
                found: found.as_str(),
                dn: self.dn.clone(),
            })
        }
    }
}

/// Assembles a [`DirectoryObject`] attribute by attribute.
#[derive(Debug)]
pub struct DirectoryObjectBuilder {
    object: DirectoryObject,
}

impl DirectoryObjectBuilder {
    /// Adds a text attribute value.
    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.object
            .attrs
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
        self
    }

    /// Adds several text values.
    #[must_use]
    pub fn attrs<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.object
            .attrs
            .entry(name.to_ascii_lowercase())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Adds a binary attribute value.
    #[must_use]
    pub fn binary(mut self, name: &str, value: Vec<u8>) -> Self {
        self.object
            .bin_attrs
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value);
        self
    }

    /// Sets `objectGUID`.
    #[must_use]
    pub fn guid(self, guid: ObjectGuid) -> Self {
        self.binary(attr::OBJECT_GUID, guid.as_bytes().to_vec())
    }

    /// Finishes the object.
    #[must_use]
    pub fn build(self) -> DirectoryObject {
        self.object
    }
}

/// Parses LDAP generalized time (`20230115103000.0Z`).
fn parse_generalized_time(value: &str) -> Option<DateTime<Utc>> {
    let digits = value.get(..14)?;
    NaiveDateTime::parse_from_str(digits, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    fn sample() -> DirectoryObject {
        DirectoryObject::builder("CN=jdoe,OU=Users,DC=example,DC=com")
            .attr("cn", "jdoe")
            .attr("mail", "jdoe@example.com")
            .attrs("objectClass", ["top", "person", "organizationalPerson", "user"])
            .attrs("memberOf", ["CN=A,DC=example,DC=com", "CN=B,DC=example,DC=com"])
            .attr("userAccountControl", "512")
            .attr("whenCreated", "20230115103000.0Z")
            .build()
    }

    #[test]
    fn get_list_shapes() {
        let obj = sample();
        assert!(obj.get_list("missing").is_empty());
        assert_eq!(obj.get_list("mail"), vec!["jdoe@example.com"]);
        assert_eq!(
            obj.get_list("memberOf"),
            vec!["CN=A,DC=example,DC=com", "CN=B,DC=example,DC=com"]
        );
    }

    #[test]
    fn get_string_never_fails() {
        let obj = sample();
        assert_eq!(obj.get_string("MAIL"), "jdoe@example.com");
        assert_eq!(obj.get_string("missing"), "");
        // Multi-valued is not a string.
        assert_eq!(obj.get_string("memberOf"), "");
        assert_eq!(obj.get_optional_string("missing"), None);
    }

    #[test]
    fn optional_int() {
        let obj = sample();
        assert_eq!(obj.get_optional_int("userAccountControl"), Some(512));
        assert_eq!(obj.get_optional_int("missing"), None);
        assert_eq!(obj.get_optional_int("mail"), None);
    }

    #[test]
    fn entity_class_and_timestamps() {
        let obj = sample();
        assert_eq!(obj.entity_class(), EntityClass::User);
        let created = obj.when_created().unwrap();
        assert_eq!((created.year(), created.month(), created.day()), (2023, 1, 15));
        assert_eq!(created.hour(), 10);
        assert!(obj.when_changed().is_none());

        let computer = EntityClass::from_object_classes(&["top", "user", "computer"]);
        assert_eq!(computer, EntityClass::Computer);
    }

    #[test]
    fn guid_from_text_or_binary() {
        let guid = ObjectGuid::from_bytes([0x41; 16]);
        let bin = DirectoryObject::builder("CN=x").guid(guid).build();
        assert_eq!(bin.guid(), Some(guid));

        let text = DirectoryObject::builder("CN=x")
            .attr("objectGUID", "A".repeat(16))
            .build();
        assert_eq!(text.guid(), Some(guid));
    }

    #[test]
    fn staged_writes_apply_locally() {
        let mut obj = sample();
        obj.set_string("givenName", "John");
        obj.add_value("memberOf", "CN=C,DC=example,DC=com");
        obj.remove_value("memberOf", "CN=A,DC=example,DC=com");
        obj.set_string("mail", "");

        assert_eq!(obj.get_string("givenName"), "John");
        assert_eq!(obj.get_list("memberOf").len(), 2);
        assert!(!obj.has_attr("mail"));
        assert_eq!(obj.pending_changes().len(), 4);
        assert_eq!(
            obj.pending_changes()[3],
            Modification::Replace("mail".to_string(), vec![])
        );
    }

    #[test]
    fn require_class_mismatch() {
        let err = sample().require_class(EntityClass::Group).unwrap_err();
        assert!(matches!(err, DirectoryError::WrongEntityClass { expected: "group", .. }));
    }
}

//! Search filter construction.
//!
//! Every value that did not originate in this crate goes through
//! [`escape`] before it is embedded in a filter.

use crate::guid::ObjectGuid;

/// Matching rule that walks nested membership to any depth.
pub const MATCHING_RULE_IN_CHAIN: &str = "1.2.840.113556.1.4.1941";

/// Filter matching every object, used for base-scope reads.
pub const ANY_OBJECT: &str = "(objectClass=*)";

/// Neutralizes filter metacharacters in an untrusted value.
///
/// Surrounding whitespace and stray NUL bytes are trimmed, then `\`, `*`,
/// `(`, `)`, `/` and NUL are replaced with their `\xx` hex escapes.
#[must_use]
pub fn escape(value: &str) -> String {
    let trimmed = value.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    let mut result = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '\\' => result.push_str("\\5c"),
            '*' => result.push_str("\\2a"),
            '(' => result.push_str("\\28"),
            ')' => result.push_str("\\29"),
            '/' => result.push_str("\\2f"),
            '\0' => result.push_str("\\00"),
            _ => result.push(c),
        }
    }
    result
}

/// Objects of `category` that are direct members of the group `guid`.
#[must_use]
pub fn direct_members(category: &str, guid: &ObjectGuid) -> String {
    format!(
        "(&(objectCategory={category})(memberOf={}))",
        guid.filter_value()
    )
}

/// Groups that contain `guid` directly or through any nesting depth.
#[must_use]
pub fn transitive_parents(guid: &ObjectGuid) -> String {
    format!("(member:{MATCHING_RULE_IN_CHAIN}:={})", guid.filter_value())
}

/// User accounts whose logon name equals `logon_name`.
#[must_use]
pub fn user_by_logon_name(logon_name: &str) -> String {
    format!("(&(objectClass=user)(sAMAccountName={}))", escape(logon_name))
}

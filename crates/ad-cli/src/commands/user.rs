//! `user`: show a directory account.

use ad_directory::{AccountControl, DirectoryView, MemberOf, User};
use serde::Serialize;

use crate::config::{AppConfig, OutputFormat};
use crate::output::output_single;

use super::connect;

/// User representation for display.
#[derive(Debug, Serialize)]
pub struct UserDisplay {
    /// Object identifier.
    pub guid: Option<String>,
    /// Distinguished name.
    pub distinguished_name: String,
    /// Logon name.
    pub username: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Surname.
    pub last_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Telephone number.
    pub telephone_number: Option<String>,
    /// Job title.
    pub title: Option<String>,
    /// Department.
    pub department: Option<String>,
    /// Whether the account is disabled.
    pub disabled: bool,
    /// Whether the password never expires.
    pub password_never_expires: bool,
    /// Creation time.
    pub created: Option<String>,
    /// Group common names.
    pub groups: Vec<String>,
}

impl From<&User> for UserDisplay {
    fn from(user: &User) -> Self {
        Self {
            guid: user.guid().map(|g| g.to_hex()),
            distinguished_name: user.distinguished_name(),
            username: user.username(),
            display_name: user.display_name(),
            first_name: user.first_name(),
            last_name: user.last_name(),
            email: user.email(),
            telephone_number: user.telephone_number(),
            title: user.title(),
            department: user.department(),
            disabled: user.is_disabled(),
            password_never_expires: user.has_flag(AccountControl::DontExpirePassword),
            created: user.when_created().map(|t| t.to_rfc3339()),
            groups: user.group_common_names(),
        }
    }
}

/// Runs `user`.
pub async fn run_user(logon: &str, config: &AppConfig, format: OutputFormat) -> crate::CliResult<()> {
    let directory = connect(config)?;
    let user = User::find_by_logon_name(&directory, &config.directory.base_dn, logon).await?;
    output_single(&UserDisplay::from(&user), format)
}

//! `members` and `parents`: group membership listings.

use ad_directory::{Group, Membership, MembershipResolver, ObjectGuid};
use serde::Serialize;
use tabled::Tabled;

use crate::config::{AppConfig, OutputFormat};
use crate::error::CliError;
use crate::output::output;

use super::connect;

/// Membership row for display.
#[derive(Debug, Serialize, Tabled)]
pub struct MembershipRow {
    /// Entity kind.
    #[tabled(rename = "Kind")]
    pub kind: String,
    /// Display name.
    #[tabled(rename = "Name")]
    pub name: String,
    /// Distinguished name.
    #[tabled(rename = "Distinguished Name")]
    pub distinguished_name: String,
    /// Object identifier.
    #[tabled(rename = "GUID")]
    pub guid: String,
}

impl From<Membership> for MembershipRow {
    fn from(m: Membership) -> Self {
        Self {
            kind: m.kind.to_string(),
            name: m.display_name,
            distinguished_name: m.distinguished_name,
            guid: m.guid.to_hex(),
        }
    }
}

fn parse_guid(guid: &str) -> crate::CliResult<ObjectGuid> {
    ObjectGuid::from_hex(guid).map_err(|e| CliError::InvalidArgument(e.to_string()))
}

/// Runs `members`.
pub async fn run_members(guid: &str, config: &AppConfig, format: OutputFormat) -> crate::CliResult<()> {
    let guid = parse_guid(guid)?;
    let directory = connect(config)?;
    let group = Group::bind_guid(&directory, &guid).await?;
    let members = MembershipResolver::new(&directory, &config.directory)
        .members(&group)
        .await?;
    let rows: Vec<MembershipRow> = members.into_iter().map(Into::into).collect();
    output(&rows, format)
}

/// Runs `parents`.
pub async fn run_parents(guid: &str, config: &AppConfig, format: OutputFormat) -> crate::CliResult<()> {
    let guid = parse_guid(guid)?;
    let directory = connect(config)?;
    let group = Group::bind_guid(&directory, &guid).await?;
    let parents = MembershipResolver::new(&directory, &config.directory)
        .parents(&group)
        .await?;
    let rows: Vec<MembershipRow> = parents.into_iter().map(Into::into).collect();
    output(&rows, format)
}

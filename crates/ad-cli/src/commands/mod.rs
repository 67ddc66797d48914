//! Command implementations.

pub mod group;
pub mod redirect;
pub mod resolve;
pub mod user;

pub use group::{run_members, run_parents};
pub use redirect::run_check_redirect;
pub use resolve::run_resolve;
pub use user::run_user;

use std::sync::Arc;

use ad_directory::LdapDirectory;

use crate::config::AppConfig;

/// Opens the directory described by the configuration.
pub fn connect(config: &AppConfig) -> crate::CliResult<LdapDirectory> {
    let directory = LdapDirectory::new(Arc::new(config.directory.clone()))?;
    tracing::debug!(url = %config.directory.connection_url, "directory client ready");
    Ok(directory)
}

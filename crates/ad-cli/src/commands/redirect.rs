//! `check-redirect`: validate a redirect URI offline.

use crate::config::AppConfig;
use crate::output::success;

/// Runs `check-redirect`.
pub fn run_check_redirect(uri: &str, config: &AppConfig) -> crate::CliResult<()> {
    config.identity_server.redirect_validator().validate(uri)?;
    success(&format!("{uri} is an accepted redirect URI"));
    Ok(())
}

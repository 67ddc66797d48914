//! CLI configuration.
//!
//! Settings come from a TOML file with `[identity_server]` and
//! `[directory]` tables. `ADIDP_*` environment variables (also read from a
//! `.env` file) override individual values, so the bind password need not
//! live in the file.

use std::path::Path;

use ad_claims::IdentityConfig;
use ad_directory::DirectoryConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Identity-provider settings.
    pub identity_server: IdentityConfig,

    /// Directory settings.
    pub directory: DirectoryConfig,
}

impl AppConfig {
    /// Loads `path` (if it exists) and applies environment overrides.
    ///
    /// ## Errors
    ///
    /// Returns [`CliError::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> CliResult<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            tracing::info!(path = %path.display(), "configuration file not found, using environment only");
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Validates the `[identity_server]` section.
    ///
    /// The directory section is checked when a connection is opened, so
    /// offline commands work without LDAP settings.
    ///
    /// ## Errors
    ///
    /// Returns [`CliError::Claims`] for a missing issuer, an empty host list
    /// or a role pattern that does not compile.
    pub fn validate(&self) -> CliResult<()> {
        self.identity_server.validate()?;
        Ok(())
    }

    /// Parses TOML text.
    ///
    /// ## Errors
    ///
    /// Returns [`CliError::Config`] on malformed input.
    pub fn from_toml(content: &str) -> CliResult<Self> {
        toml::from_str(content).map_err(|e| CliError::Config(format!("failed to parse config: {e}")))
    }

    /// Applies `ADIDP_*` overrides looked up through `var`.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let directory = &mut self.directory;
        if let Some(url) = var("ADIDP_LDAP_URL") {
            directory.connection_url = url;
        }
        if let Some(dn) = var("ADIDP_BIND_DN") {
            directory.bind_dn = dn;
        }
        if let Some(password) = var("ADIDP_BIND_PASSWORD") {
            directory.bind_credential = password;
        }
        if let Some(base) = var("ADIDP_BASE_DN") {
            directory.base_dn = base;
        }
        if let Some(validate) = var("ADIDP_VALIDATE_CERTIFICATES").and_then(|v| v.parse().ok()) {
            directory.validate_certificates = validate;
        }

        let identity = &mut self.identity_server;
        if let Some(uri) = var("ADIDP_SERVER_URI") {
            identity.server_uri = uri;
        }
        if let Some(hosts) = var("ADIDP_HOSTS") {
            identity.hosts = hosts
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(String::from)
                .collect();
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::OutputFormat;

/// adidp - resolve directory identities into identity-provider claims.
#[derive(Debug, Parser)]
#[command(name = "adidp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file.
    #[arg(short, long, env = "ADIDP_CONFIG", default_value = "adidp.toml")]
    pub config: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Enable debug logging (ignored when RUST_LOG is set).
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Project claims for an authenticated principal.
    Resolve(ResolveArgs),

    /// Show a directory user by logon name.
    User {
        /// Logon name, with or without a `DOMAIN\` prefix.
        logon: String,
    },

    /// List the direct members of a group.
    Members {
        /// Group identifier (32 hex characters).
        guid: String,
    },

    /// List every group that contains a group.
    Parents {
        /// Group identifier (32 hex characters).
        guid: String,
    },

    /// Check a redirect URI against the trusted hosts.
    CheckRedirect {
        /// Redirect URI.
        uri: String,
    },
}

/// Arguments for `resolve`.
#[derive(Debug, clap::Args)]
pub struct ResolveArgs {
    /// Account name (`DOMAIN\user`).
    #[arg(long)]
    pub account: String,

    /// Primary SID.
    #[arg(long)]
    pub sid: String,

    /// Group SIDs; repeat for several.
    #[arg(long = "group-sid")]
    pub group_sids: Vec<String>,

    /// Requested scopes, space separated.
    #[arg(long, default_value = "openid profile email roles")]
    pub scope: String,

    /// Redirect URI to validate before projecting.
    #[arg(long)]
    pub redirect_uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_resolve() {
        let cli = Cli::try_parse_from([
            "adidp",
            "--output",
            "json",
            "resolve",
            "--account",
            "CORP\\jdoe",
            "--sid",
            "S-1-5-21-1-1001",
            "--group-sid",
            "S-1-1-0",
            "--group-sid",
            "S-1-2-0",
        ])
        .unwrap();

        assert!(matches!(cli.output, OutputFormat::Json));
        match cli.command {
            Command::Resolve(args) => {
                assert_eq!(args.group_sids.len(), 2);
                assert_eq!(args.scope, "openid profile email roles");
                assert!(args.redirect_uri.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_members() {
        let cli = Cli::try_parse_from(["adidp", "members", "00112233445566778899aabbccddeeff"]).unwrap();
        assert!(matches!(cli.command, Command::Members { .. }));
        assert_eq!(cli.config, PathBuf::from("adidp.toml"));
    }
}

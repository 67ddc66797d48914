//! # adidp
//!
//! Command-line entry point.

#![forbid(unsafe_code)]

use ad_cli::{
    cli::{Cli, Command},
    commands::{run_check_redirect, run_members, run_parents, run_resolve, run_user},
    config::AppConfig,
    output::error,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load(&cli.config)?;
    config.validate()?;

    let result = match cli.command {
        Command::Resolve(args) => run_resolve(args, &config, cli.output).await,
        Command::User { logon } => run_user(&logon, &config, cli.output).await,
        Command::Members { guid } => run_members(&guid, &config, cli.output).await,
        Command::Parents { guid } => run_parents(&guid, &config, cli.output).await,
        Command::CheckRedirect { uri } => run_check_redirect(&uri, &config),
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}

//! # ad-cli
//!
//! Operator tool for the directory-backed identity provider.
//!
//! This crate provides command-line utilities for:
//! - Projecting claims for a principal, as an authorization request would
//! - Looking up directory users
//! - Listing group members and ancestors
//! - Checking redirect URIs against the trusted hosts

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::future_not_send)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::AppConfig;
pub use error::{CliError, CliResult};

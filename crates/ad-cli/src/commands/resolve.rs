//! `resolve`: project claims for a principal.

use std::collections::BTreeMap;
use std::sync::Arc;

use ad_claims::{AuthenticatedPrincipal, ClaimSet, ClaimsProjector, Destination, ScopeSet};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::ResolveArgs;
use crate::config::{AppConfig, OutputFormat};
use crate::output::{info, output, output_single};

use super::connect;

/// Claim row for table output.
#[derive(Debug, Serialize, Tabled)]
pub struct ClaimRow {
    /// Claim type.
    #[tabled(rename = "Claim")]
    pub claim: String,
    /// Claim value.
    #[tabled(rename = "Value")]
    pub value: String,
    /// Destination tokens.
    #[tabled(rename = "Destinations")]
    pub destinations: String,
}

/// Runs `resolve`.
pub async fn run_resolve(
    args: ResolveArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let directory = Arc::new(connect(config)?);
    let projector = ClaimsProjector::new(
        directory,
        config.directory.base_dn.clone(),
        Arc::new(config.identity_server.clone()),
    )?;

    let principal = AuthenticatedPrincipal::new(args.account, args.sid).with_group_sids(args.group_sids);
    let scopes = ScopeSet::parse(&args.scope);
    if let Some(notice) = empty_scope_notice(&scopes, format) {
        info(notice);
    } else if scopes.is_empty() {
        tracing::warn!(scope = %args.scope, "no recognised scopes requested");
    }

    let claims = match args.redirect_uri.as_deref() {
        Some(uri) => projector.authorize(uri, &principal, &scopes).await?,
        None => projector.project(&principal, &scopes).await?,
    };
    tracing::info!(account = %principal.account_name, claims = claims.len(), "resolved principal");

    match format {
        OutputFormat::Table => output(&claim_rows(&claims), format),
        OutputFormat::Json => output_single(&tokens(&claims), format),
    }
}

/// Stdout notice for a request with no usable scopes. JSON output stays
/// machine-readable, so the notice is only shown in table mode.
fn empty_scope_notice(scopes: &ScopeSet, format: OutputFormat) -> Option<&'static str> {
    match format {
        OutputFormat::Table if scopes.is_empty() => {
            Some("No recognised scopes requested; no claims will be emitted.")
        }
        _ => None,
    }
}

fn claim_rows(claims: &ClaimSet) -> Vec<ClaimRow> {
    claims
        .iter()
        .map(|claim| ClaimRow {
            claim: claim.claim_type.to_string(),
            value: claim.value.clone(),
            destinations: claim
                .destinations
                .iter()
                .map(Destination::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect()
}

/// Per-token JSON claim objects.
fn tokens(claims: &ClaimSet) -> BTreeMap<&'static str, serde_json::Value> {
    Destination::ALL
        .into_iter()
        .map(|d| (d.as_str(), claims.to_json(d)))
        .collect()
}

use anyhow::{Context, Result};
use colored::*;

use super::CatalogArgs;
use crate::api::InventoryClient;
use crate::catalog::{CatalogKind, CatalogSource};
use crate::cli::commands::require_session;
use crate::config::Config;

pub async fn handle_catalog_command(args: CatalogArgs, config: &Config) -> Result<()> {
    let session = require_session(config).await?;
    let client = InventoryClient::for_session(config, &session)?;
    let kind: CatalogKind = args.kind.into();

    let entries = client
        .fetch(kind)
        .await
        .with_context(|| format!("Failed to load {}", kind))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No {} defined.", kind);
        return Ok(());
    }

    let width = entries
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(2)
        .max(2);
    println!("{}  {}", format!("{:>width$}", "ID").bold(), "NAME".bold());
    for entry in &entries {
        println!("{}  {}", format!("{:>width$}", entry.id).dimmed(), entry.label);
    }
    println!();
    println!("{} {}", entries.len(), kind);
    Ok(())
}

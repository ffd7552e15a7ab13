//! Import command handler

use anyhow::{Context, Result, bail};
use colored::*;
use is_terminal::IsTerminal;

use super::ImportArgs;
use super::editor::{self, EditorAction, describe_row};
use crate::api::{CatalogEntry, InventoryClient};
use crate::cli::commands::require_session;
use crate::cli::console::ConsoleObserver;
use crate::config::Config;
use crate::import::{
    BatchOutcome, ImportEngine, ImportError, RowField, write_report_xlsx,
};
use crate::ingest::{Ingestor, LocalWorkbook, RejectedRow};
use crate::notify::ImportObserver;

pub async fn handle_import_command(args: ImportArgs, config: &Config) -> Result<()> {
    if !args.file.exists() {
        bail!("Spreadsheet does not exist: {}", args.file.display());
    }

    let session = require_session(config).await?;
    let client = InventoryClient::for_session(config, &session)?;

    let ingestion = if args.local {
        let reader = match &args.sheet {
            Some(sheet) => LocalWorkbook::with_sheet(sheet.as_str()),
            None => LocalWorkbook::new(),
        };
        reader.ingest(&args.file).await?
    } else {
        client.ingest(&args.file).await?
    };

    print_rejected(&ingestion.invalid_rows);
    if ingestion.valid_rows.is_empty() {
        bail!("No importable rows in {}", args.file.display());
    }

    let mut engine =
        ImportEngine::open(&ingestion.valid_rows, &client, ConsoleObserver::new()).await;
    if !engine.is_open() {
        bail!("Import aborted: the catalogs could not be loaded");
    }

    if let Some(category) = &args.category {
        apply_default(&mut engine, RowField::Category, category)?;
    }
    if let Some(location) = &args.location {
        apply_default(&mut engine, RowField::Location, location)?;
    }

    let interactive = !args.yes && std::io::stdin().is_terminal() && std::io::stdout().is_terminal();

    let report = loop {
        if interactive {
            match editor::run(&mut engine)? {
                EditorAction::Submit => {}
                EditorAction::Cancel => {
                    engine.cancel();
                    println!("Import cancelled, nothing was created.");
                    return Ok(());
                }
            }
        } else {
            print_preview(&engine);
        }

        match engine.finalize(&session, &client).await {
            Ok(report) => break report,
            // Already shown to the operator; back to the editor to fix it
            Err(ImportError::Validation(_)) if interactive => continue,
            Err(err) => return Err(err).context("Import did not start"),
        }
    };

    if let Some(path) = &args.report {
        write_report_xlsx(&report, &ingestion.invalid_rows, path)?;
        println!("Report written to {}", path.display().to_string().cyan());
    }

    match report.outcome() {
        BatchOutcome::Success => Ok(()),
        BatchOutcome::PartialFailure => bail!("{} item(s) could not be created", report.failed.len()),
        BatchOutcome::Halted => bail!("Import halted on a duplicate SAP code"),
    }
}

/// Find a catalog entry by id, then by name (case-insensitive)
pub fn resolve_entry<'a>(entries: &'a [CatalogEntry], input: &str) -> Option<&'a CatalogEntry> {
    let input = input.trim();
    input
        .parse::<i64>()
        .ok()
        .and_then(|id| entries.iter().find(|e| e.id == id))
        .or_else(|| entries.iter().find(|e| e.label.eq_ignore_ascii_case(input)))
}

/// Fill `field` on every row that left it blank; returns how many rows changed
pub fn apply_default<O: ImportObserver>(
    engine: &mut ImportEngine<O>,
    field: RowField,
    input: &str,
) -> Result<usize> {
    let entries = match field {
        RowField::Category => &engine.catalogs().categories,
        RowField::Location => &engine.catalogs().locations,
        other => bail!("{} has no catalog", other),
    };
    let entry = resolve_entry(entries, input)
        .with_context(|| format!("Unknown {}: {}", field.label().to_lowercase(), input))?
        .clone();

    let blank: Vec<usize> = engine
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.get(field).trim().is_empty())
        .map(|(idx, _)| idx)
        .collect();

    let id = entry.id.to_string();
    for &idx in &blank {
        engine.edit_field(idx, field, &id)?;
    }

    if !blank.is_empty() {
        log::info!("Set {} to {} on {} rows", field, entry.label, blank.len());
        println!(
            "Assigned {} {} to {} row(s)",
            field.label().to_lowercase(),
            entry.label.bright_white(),
            blank.len()
        );
    }
    Ok(blank.len())
}

fn print_rejected(rejected: &[RejectedRow]) {
    if rejected.is_empty() {
        return;
    }
    eprintln!(
        "{} {} row(s) are missing required columns and will not be imported:",
        "⚠".yellow().bold(),
        rejected.len()
    );
    for row in rejected {
        eprintln!("  {}", row.describe().dimmed());
    }
}

fn print_preview<O: ImportObserver>(engine: &ImportEngine<O>) {
    println!("{}", format!("{} item(s) to import:", engine.rows().len()).bold());
    for (idx, row) in engine.rows().iter().enumerate() {
        println!("  {}", describe_row(idx, row, engine.catalogs()));
    }
}

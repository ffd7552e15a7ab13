//! Interactive correction of the working set before submission

use anyhow::Result;
use colored::*;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::api::CatalogEntry;
use crate::catalog::{CatalogKind, Catalogs};
use crate::import::{ImportEngine, ImportRow, RowField};
use crate::notify::ImportObserver;

pub enum EditorAction {
    Submit,
    Cancel,
}

enum RowAction {
    Category,
    Location,
    Field(RowField),
    Spec(String),
    AddSpec,
    RemoveSpec,
    RemoveRow,
    Back,
}

const TEXT_FIELDS: [RowField; 5] = [
    RowField::Quantity,
    RowField::Brand,
    RowField::Description,
    RowField::MinimumStock,
    RowField::ExpirationDate,
];

/// One-line summary of a row for listings
pub fn describe_row(index: usize, row: &ImportRow, catalogs: &Catalogs) -> String {
    let category = if row.is_missing_category() {
        "no category".red().to_string()
    } else {
        catalogs
            .label_for(CatalogKind::Categories, row.get(RowField::Category))
            .unwrap_or(row.get(RowField::Category))
            .to_string()
    };

    let mut line = format!(
        "{:>3}. {} ({}) qty {} | {}",
        index + 1,
        row.name(),
        row.sap_code(),
        row.get(RowField::Quantity),
        category
    );
    if !row.get(RowField::Location).trim().is_empty() {
        let location = catalogs
            .label_for(CatalogKind::Locations, row.get(RowField::Location))
            .unwrap_or(row.get(RowField::Location));
        line.push_str(&format!(" @ {}", location));
    }
    if !row.specs().is_empty() {
        line.push_str(&format!(" | {} spec(s)", row.specs().len()));
    }
    if row.is_edited() {
        line.push_str(&format!(" {}", "*".yellow()));
    }
    line
}

/// Let the operator fix rows until they choose to import or cancel
pub fn run<O: ImportObserver>(engine: &mut ImportEngine<O>) -> Result<EditorAction> {
    let theme = ColorfulTheme::default();

    loop {
        let mut items: Vec<String> = engine
            .rows()
            .iter()
            .enumerate()
            .map(|(idx, row)| describe_row(idx, row, engine.catalogs()))
            .collect();
        let submit = items.len();
        items.push(format!("Import {} item(s)", engine.rows().len()).green().to_string());
        items.push("Cancel".to_string());

        let choice = Select::with_theme(&theme)
            .with_prompt("Select a row to edit")
            .items(&items)
            .default(submit)
            .interact()?;

        if choice == submit {
            return Ok(EditorAction::Submit);
        }
        if choice == submit + 1 {
            let discard = Confirm::with_theme(&theme)
                .with_prompt("Discard this import?")
                .default(false)
                .interact()?;
            if discard {
                return Ok(EditorAction::Cancel);
            }
            continue;
        }

        edit_row(engine, choice, &theme)?;
    }
}

fn row_actions(row: &ImportRow) -> Vec<(String, RowAction)> {
    let mut actions = vec![
        (
            format!("Category: {}", or_dash(row.get(RowField::Category))),
            RowAction::Category,
        ),
        (
            format!("Location: {}", or_dash(row.get(RowField::Location))),
            RowAction::Location,
        ),
    ];
    for field in TEXT_FIELDS {
        actions.push((
            format!("{}: {}", field.label(), or_dash(row.get(field))),
            RowAction::Field(field),
        ));
    }
    for (key, value) in row.specs() {
        actions.push((format!("{}: {}", key, value), RowAction::Spec(key.clone())));
    }
    actions.push(("Add technical spec".to_string(), RowAction::AddSpec));
    if !row.specs().is_empty() {
        actions.push(("Remove technical spec".to_string(), RowAction::RemoveSpec));
    }
    actions.push(("Remove this row".red().to_string(), RowAction::RemoveRow));
    actions.push(("Back".to_string(), RowAction::Back));
    actions
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

fn edit_row<O: ImportObserver>(
    engine: &mut ImportEngine<O>,
    index: usize,
    theme: &ColorfulTheme,
) -> Result<()> {
    loop {
        let Some(row) = engine.row(index) else {
            return Ok(());
        };
        let title = format!("{} ({})", row.name(), row.sap_code());
        let (labels, mut actions): (Vec<String>, Vec<RowAction>) =
            row_actions(row).into_iter().unzip();

        let choice = Select::with_theme(theme)
            .with_prompt(title)
            .items(&labels)
            .default(0)
            .interact()?;

        match actions.swap_remove(choice) {
            RowAction::Back => return Ok(()),
            RowAction::Category => {
                let entries = engine.catalogs().categories.clone();
                if let Some(entry) = pick_entry(theme, "Category", &entries)? {
                    engine.edit_field(index, RowField::Category, &entry.id.to_string())?;
                }
            }
            RowAction::Location => {
                let entries = engine.catalogs().locations.clone();
                let mut labels = vec!["(none)"];
                labels.extend(entries.iter().map(|e| e.label.as_str()));
                let picked = Select::with_theme(theme)
                    .with_prompt("Location")
                    .items(&labels)
                    .default(0)
                    .interact_opt()?;
                match picked {
                    Some(0) => engine.edit_field(index, RowField::Location, "")?,
                    Some(picked) => engine.edit_field(
                        index,
                        RowField::Location,
                        &entries[picked - 1].id.to_string(),
                    )?,
                    None => {}
                }
            }
            RowAction::Field(field) => {
                let current = engine.rows()[index].get(field).to_string();
                let value: String = Input::with_theme(theme)
                    .with_prompt(field.label())
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()?;
                engine.edit_field(index, field, &value)?;
            }
            RowAction::Spec(key) => {
                let current = engine.rows()[index].spec(&key).unwrap_or_default().to_string();
                let value: String = Input::with_theme(theme)
                    .with_prompt(key.as_str())
                    .with_initial_text(current)
                    .interact_text()?;
                engine.edit_spec_value(index, &key, &value)?;
            }
            RowAction::AddSpec => add_spec(engine, index, theme)?,
            RowAction::RemoveSpec => {
                let keys: Vec<String> = engine.rows()[index].specs().keys().cloned().collect();
                let picked = Select::with_theme(theme)
                    .with_prompt("Remove which spec?")
                    .items(&keys)
                    .interact_opt()?;
                if let Some(picked) = picked {
                    engine.remove_spec_field(index, &keys[picked])?;
                }
            }
            RowAction::RemoveRow => {
                let confirmed = Confirm::with_theme(theme)
                    .with_prompt(format!("Remove {} from the import?", engine.rows()[index].name()))
                    .default(false)
                    .interact()?;
                if confirmed {
                    engine.remove_row(index)?;
                    return Ok(());
                }
            }
        }
    }
}

/// Choose one catalog entry. An empty catalog only warns; dialoguer
/// refuses to render a select without items.
fn pick_entry<'a>(
    theme: &ColorfulTheme,
    prompt: &str,
    entries: &'a [CatalogEntry],
) -> Result<Option<&'a CatalogEntry>> {
    if entries.is_empty() {
        println!("{}", format!("No {} entries are defined.", prompt.to_lowercase()).yellow());
        return Ok(None);
    }

    let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
    let picked = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(picked.map(|idx| &entries[idx]))
}

fn add_spec<O: ImportObserver>(
    engine: &mut ImportEngine<O>,
    index: usize,
    theme: &ColorfulTheme,
) -> Result<()> {
    let specs = engine.catalogs().technical_specs.clone();
    let Some(spec) = pick_entry(theme, "Technical spec", &specs)? else {
        return Ok(());
    };
    engine.select_spec(index, Some(spec.id))?;

    let value: String = Input::with_theme(theme)
        .with_prompt(spec.label.as_str())
        .allow_empty(true)
        .interact_text()?;
    engine.set_spec_value(index, &value)?;

    // Warnings for a blank value or a reserved name come from the engine
    engine.add_spec_to_row(index)?;
    Ok(())
}

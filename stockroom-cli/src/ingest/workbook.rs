//! Local `.xlsx` ingestion
//!
//! Reads the first sheet (or a named one). The first row holds the headers,
//! which are normalised to wire field names; unknown headers are kept as-is
//! and become technical-specification keys.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use calamine::{Data, Reader, Xlsx, open_workbook};
use regex::Regex;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::{IngestedRow, IngestionResult, Ingestor, RejectedRow};

/// Columns every row must fill to be importable
pub const REQUIRED_COLUMNS: &[&str] = &["name", "sapCode", "quantity"];

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));

/// Map a spreadsheet header to its wire field name.
/// "SAP Code" -> "sapCode", "Min. stock" -> "minimumStock", "Voltage" -> "Voltage"
pub fn normalize_header(header: &str) -> String {
    let lowered = header.trim().to_lowercase();
    let squashed = NON_ALNUM.replace_all(&lowered, "");

    let known = match squashed.as_ref() {
        "name" | "itemname" | "item" => "name",
        "sapcode" | "sap" | "code" => "sapCode",
        "brand" | "manufacturer" => "brand",
        "description" | "desc" => "description",
        "minimumstock" | "minstock" | "minimum" => "minimumStock",
        "quantity" | "qty" | "stock" => "quantity",
        "expirationdate" | "expiration" | "expirydate" | "expires" => "expirationDate",
        "category" | "categoryid" | "fkidcategory" => "fkIdCategory",
        "location" | "locationid" | "fkidlocation" => "fkIdLocation",
        _ => return header.trim().to_string(),
    };
    known.to_string()
}

/// Convert an Excel cell to JSON. Whole floats become integers; dates
/// become `YYYY-MM-DD`.
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::String(s.trim().to_string()),
        Data::Int(i) => json!(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                json!(*f as i64)
            } else {
                json!(*f)
            }
        }
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => Value::String(datetime.format("%Y-%m-%d").to_string()),
            None => Value::String(dt.to_string()),
        },
        Data::DateTimeIso(s) => Value::String(s.chars().take(10).collect()),
        Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) => Value::Null,
    }
}

/// Spreadsheet ingestor that parses the file on this machine
#[derive(Debug, Clone, Default)]
pub struct LocalWorkbook {
    sheet: Option<String>,
}

impl LocalWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a specific sheet instead of the first one
    pub fn with_sheet(sheet: impl Into<String>) -> Self {
        Self {
            sheet: Some(sheet.into()),
        }
    }

    pub fn read(&self, path: &Path) -> Result<IngestionResult> {
        let mut workbook: Xlsx<_> = open_workbook(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

        let sheet_name = match &self.sheet {
            Some(name) => name.clone(),
            None => match workbook.sheet_names().first() {
                Some(name) => name.clone(),
                None => bail!("Workbook has no sheets: {}", path.display()),
            },
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;
        let first_row = range.start().map(|(r, _)| r).unwrap_or(0);

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|c| match c {
                    Data::String(s) => normalize_header(s),
                    Data::Empty => String::new(),
                    other => normalize_header(&other.to_string()),
                })
                .collect(),
            None => return Ok(IngestionResult::default()),
        };

        let mut result = IngestionResult::default();

        for (idx, cells) in rows.enumerate() {
            let mut row = IngestedRow::new();
            for (col, cell) in cells.iter().enumerate() {
                let header = headers.get(col).map(|h| h.as_str()).unwrap_or("");
                if header.is_empty() {
                    continue;
                }
                let value = cell_to_value(cell);
                if !value.is_null() {
                    row.0.insert(header.to_string(), value);
                }
            }

            if row.0.is_empty() {
                continue;
            }

            let missing: Vec<String> = REQUIRED_COLUMNS
                .iter()
                .filter(|col| row.text(col).is_none())
                .map(|col| col.to_string())
                .collect();

            if missing.is_empty() {
                result.valid_rows.push(row);
            } else {
                // +2: header row, and spreadsheet rows are 1-based
                let row_number = first_row + idx as u32 + 2;
                log::debug!("Row {} rejected, missing {:?}", row_number, missing);
                result.invalid_rows.push(RejectedRow {
                    row: Some(row_number),
                    missing,
                    data: row,
                });
            }
        }

        log::info!(
            "Parsed {}: {} valid rows, {} invalid rows",
            path.display(),
            result.valid_rows.len(),
            result.invalid_rows.len()
        );

        Ok(result)
    }
}

#[async_trait]
impl Ingestor for LocalWorkbook {
    async fn ingest(&self, path: &Path) -> Result<IngestionResult> {
        let reader = self.clone();
        let path: PathBuf = path.to_path_buf();
        tokio::task::spawn_blocking(move || reader.read(&path))
            .await
            .context("Spreadsheet parser task failed")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("SAP Code"), "sapCode");
        assert_eq!(normalize_header("sap_code"), "sapCode");
        assert_eq!(normalize_header(" Name "), "name");
        assert_eq!(normalize_header("Min. Stock"), "minimumStock");
        assert_eq!(normalize_header("Category"), "fkIdCategory");
        assert_eq!(normalize_header("Expiration date"), "expirationDate");
        assert_eq!(normalize_header("Voltage"), "Voltage");
        assert_eq!(normalize_header(" Max RPM "), "Max RPM");
    }

    #[test]
    fn test_cell_to_value() {
        assert_eq!(cell_to_value(&Data::Float(5.0)), json!(5));
        assert_eq!(cell_to_value(&Data::Float(2.5)), json!(2.5));
        assert_eq!(cell_to_value(&Data::String("  ".to_string())), Value::Null);
        assert_eq!(
            cell_to_value(&Data::DateTimeIso("2025-03-01T00:00:00".to_string())),
            json!("2025-03-01")
        );
    }

    fn write_sheet(path: &Path, rows: &[&[&str]]) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, cells) in rows.iter().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(n) => sheet.write_number(r as u32, c as u16, n).unwrap(),
                    Err(_) => sheet.write_string(r as u32, c as u16, *cell).unwrap(),
                };
            }
        }
        workbook.save(path).unwrap();
    }

    #[tokio::test]
    async fn test_ingest_splits_valid_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.xlsx");
        write_sheet(
            &path,
            &[
                &["Name", "SAP Code", "Brand", "Description", "Quantity", "Voltage"],
                &["Drill", "A1", "Bosch", "Hand drill", "5", "18V"],
                &["Saw", "", "Makita", "Circular saw", "2", ""],
                &["", "", "", "", "", ""],
                &["Gloves", "G7", "", "", "40", ""],
            ],
        );

        let result = LocalWorkbook::new().ingest(&path).await.unwrap();

        assert_eq!(result.valid_rows.len(), 2);
        let drill = &result.valid_rows[0];
        assert_eq!(drill.text("sapCode"), Some("A1".to_string()));
        assert_eq!(drill.text("quantity"), Some("5".to_string()));
        assert_eq!(drill.text("Voltage"), Some("18V".to_string()));
        assert_eq!(result.valid_rows[1].text("brand"), None);

        assert_eq!(result.invalid_rows.len(), 1);
        assert_eq!(result.invalid_rows[0].row, Some(3));
        assert_eq!(result.invalid_rows[0].missing, vec!["sapCode".to_string()]);
    }

    #[test]
    fn test_reads_named_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two_sheets.xlsx");

        let mut workbook = Workbook::new();
        let notes = workbook.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_string(0, 0, "Read me first").unwrap();
        let items = workbook.add_worksheet();
        items.set_name("Items").unwrap();
        items.write_string(0, 0, "name").unwrap();
        items.write_string(0, 1, "sapCode").unwrap();
        items.write_string(0, 2, "quantity").unwrap();
        items.write_string(1, 0, "Drill").unwrap();
        items.write_string(1, 1, "A1").unwrap();
        items.write_number(1, 2, 3.0).unwrap();
        workbook.save(&path).unwrap();

        let first = LocalWorkbook::new().read(&path).unwrap();
        assert!(first.valid_rows.is_empty());

        let result = LocalWorkbook::with_sheet("Items").read(&path).unwrap();
        assert_eq!(result.valid_rows.len(), 1);
        assert_eq!(result.valid_rows[0].text("name"), Some("Drill".to_string()));

        assert!(LocalWorkbook::with_sheet("Missing").read(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = LocalWorkbook::new()
            .read(Path::new("/definitely/not/here.xlsx"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open Excel file"));
    }
}

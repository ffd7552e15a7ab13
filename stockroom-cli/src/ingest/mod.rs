//! Spreadsheet ingestion
//!
//! An ingestor turns an uploaded spreadsheet into rows that carry every
//! required column ("valid") and rows that don't ("invalid"). The import
//! engine only ever sees the valid ones.

mod workbook;

pub use workbook::{LocalWorkbook, REQUIRED_COLUMNS, normalize_header};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// One parsed row, keyed by wire field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngestedRow(pub Map<String, Value>);

impl IngestedRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Text form of a cell; `None` for null, missing or blank values
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(value_to_text)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }
}

/// Render a JSON cell as editable text
pub fn value_to_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}

/// A row the ingestor refused because required columns were empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRow {
    /// 1-based spreadsheet row number, header row included
    #[serde(default, alias = "rowNumber")]
    pub row: Option<u32>,
    #[serde(default, alias = "missingFields")]
    pub missing: Vec<String>,
    #[serde(default)]
    pub data: IngestedRow,
}

impl RejectedRow {
    /// Short description for listings: row number, name and missing columns
    pub fn describe(&self) -> String {
        let position = self
            .row
            .map(|r| format!("row {}", r))
            .unwrap_or_else(|| "row ?".to_string());
        let name = self.data.text("name").unwrap_or_else(|| "(no name)".to_string());
        if self.missing.is_empty() {
            format!("{} ({})", position, name)
        } else {
            format!("{} ({}): missing {}", position, name, self.missing.join(", "))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionResult {
    #[serde(default)]
    pub valid_rows: Vec<IngestedRow>,
    #[serde(default)]
    pub invalid_rows: Vec<RejectedRow>,
}

/// Parses a spreadsheet into valid and invalid rows
#[async_trait]
pub trait Ingestor: Send + Sync {
    async fn ingest(&self, path: &Path) -> Result<IngestionResult>;
}

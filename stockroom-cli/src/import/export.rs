//! Write a finalize report to Excel
//!
//! One workbook with three sheets: the items created, the items the server
//! refused (with the reason) and the spreadsheet rows ingestion rejected.

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

use crate::ingest::RejectedRow;

use super::report::BatchReport;

pub const CREATED_SHEET: &str = "Created";
pub const FAILED_SHEET: &str = "Failed";
pub const REJECTED_SHEET: &str = "Rejected rows";

/// Column indices for the "Failed" sheet
mod cols {
    pub const POSITION: u16 = 0;
    pub const NAME: u16 = 1;
    pub const SAP_CODE: u16 = 2;
    pub const DUPLICATE: u16 = 3;
    pub const DETAIL: u16 = 4;
}

pub fn write_report_xlsx(report: &BatchReport, rejected: &[RejectedRow], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let created = workbook.add_worksheet();
    created.set_name(CREATED_SHEET)?;
    write_created(created, report, &header)?;

    let failed = workbook.add_worksheet();
    failed.set_name(FAILED_SHEET)?;
    write_failed(failed, report, &header)?;

    let rejected_ws = workbook.add_worksheet();
    rejected_ws.set_name(REJECTED_SHEET)?;
    write_rejected(rejected_ws, rejected, &header)?;

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!(
        "Wrote import report ({} created, {} failed, {} rejected) to {}",
        report.created.len(),
        report.failed.len(),
        rejected.len(),
        path.display()
    );
    Ok(())
}

fn write_created(ws: &mut Worksheet, report: &BatchReport, header: &Format) -> Result<()> {
    ws.write_string_with_format(0, 0, "name", header)?;
    for (idx, name) in report.created.iter().enumerate() {
        ws.write_string((idx + 1) as u32, 0, name)?;
    }
    ws.set_column_width(0, 40)?;
    Ok(())
}

fn write_failed(ws: &mut Worksheet, report: &BatchReport, header: &Format) -> Result<()> {
    ws.write_string_with_format(0, cols::POSITION, "row", header)?;
    ws.write_string_with_format(0, cols::NAME, "name", header)?;
    ws.write_string_with_format(0, cols::SAP_CODE, "sapCode", header)?;
    ws.write_string_with_format(0, cols::DUPLICATE, "duplicate_code", header)?;
    ws.write_string_with_format(0, cols::DETAIL, "error", header)?;

    for (idx, failure) in report.failed.iter().enumerate() {
        let row = (idx + 1) as u32;
        ws.write_number(row, cols::POSITION, failure.position as f64)?;
        ws.write_string(row, cols::NAME, &failure.name)?;
        ws.write_string(row, cols::SAP_CODE, &failure.sap_code)?;
        ws.write_boolean(row, cols::DUPLICATE, failure.duplicate_code)?;
        ws.write_string(row, cols::DETAIL, &failure.detail)?;
    }

    ws.set_column_width(cols::NAME, 40)?;
    ws.set_column_width(cols::DETAIL, 60)?;
    Ok(())
}

/// One column per key seen across the rejected rows, after row and missing
fn write_rejected(ws: &mut Worksheet, rejected: &[RejectedRow], header: &Format) -> Result<()> {
    let mut keys: Vec<&str> = Vec::new();
    for entry in rejected {
        for key in entry.data.keys() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }

    ws.write_string_with_format(0, 0, "row", header)?;
    ws.write_string_with_format(0, 1, "missing", header)?;
    for (idx, key) in keys.iter().enumerate() {
        ws.write_string_with_format(0, (idx + 2) as u16, *key, header)?;
    }

    for (idx, entry) in rejected.iter().enumerate() {
        let row = (idx + 1) as u32;
        if let Some(number) = entry.row {
            ws.write_number(row, 0, number as f64)?;
        }
        ws.write_string(row, 1, entry.missing.join(", "))?;
        for (col_idx, key) in keys.iter().enumerate() {
            if let Some(text) = entry.data.text(key) {
                ws.write_string(row, (col_idx + 2) as u16, text)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::report::RowFailure;
    use crate::ingest::IngestedRow;
    use calamine::{Data, Reader, Xlsx, open_workbook};

    #[test]
    fn test_report_workbook_has_three_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");

        let mut report = BatchReport::new(3);
        report.created = vec!["Drill".to_string()];
        report.failed = vec![RowFailure {
            position: 2,
            name: "Saw".to_string(),
            sap_code: "B2".to_string(),
            detail: "DUPLICATE_SAP_CODE".to_string(),
            duplicate_code: true,
        }];
        report.halted = true;

        let rejected = vec![RejectedRow {
            row: Some(7),
            missing: vec!["quantity".to_string()],
            data: IngestedRow::new().with("name", "Glue").with("sapCode", "C3"),
        }];

        write_report_xlsx(&report, &rejected, &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            vec![CREATED_SHEET, FAILED_SHEET, REJECTED_SHEET]
        );

        let created = workbook.worksheet_range(CREATED_SHEET).unwrap();
        assert_eq!(created.get_value((1, 0)), Some(&Data::String("Drill".to_string())));

        let failed = workbook.worksheet_range(FAILED_SHEET).unwrap();
        assert_eq!(failed.get_value((1, 0)), Some(&Data::Float(2.0)));
        assert_eq!(failed.get_value((1, 3)), Some(&Data::Bool(true)));

        let rejected_range = workbook.worksheet_range(REJECTED_SHEET).unwrap();
        assert_eq!(
            rejected_range.get_value((0, 2)),
            Some(&Data::String("name".to_string()))
        );
        assert_eq!(
            rejected_range.get_value((1, 1)),
            Some(&Data::String("quantity".to_string()))
        );
        assert_eq!(
            rejected_range.get_value((1, 2)),
            Some(&Data::String("Glue".to_string()))
        );
    }
}

// 📂 Export Loader - Daily Genesys snapshot → typed records
// Columns are matched by normalized header name; order and extras are ignored

use crate::schema::{cell, require_columns};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Required columns of the daily export, by their original header names.
pub const REQUIRED_EXPORT_COLUMNS: [&str; 6] = [
    "inin-outbound-id",
    "borrower_id",
    "full_name",
    "phone",
    "CallRecordLastResult-phone",
    "CallRecordLastAgentWrapup-phone",
];

/// One row of the daily export. Immutable once read.
/// Identifiers are trimmed at this boundary; the free-text fields
/// (phone, result, wrapup) stay raw for the filter pipeline to normalize.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    pub outbound_id: String,
    pub borrower_id: String,
    pub full_name: String,
    pub phone: String,
    pub last_result: String,
    pub last_wrapup: String,
}

/// Load the daily export from any reader.
/// Fails with `SchemaError` when required columns are missing.
pub fn load_export<R: Read>(reader: R) -> Result<Vec<InputRecord>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers().context("failed to read export header row")?.clone();
    let positions = require_columns(&headers, &REQUIRED_EXPORT_COLUMNS, "export")?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row.context("failed to read export row")?;
        records.push(InputRecord {
            outbound_id: cell(&row, &positions, "inin-outbound-id").trim().to_string(),
            borrower_id: cell(&row, &positions, "borrower_id").trim().to_string(),
            full_name: cell(&row, &positions, "full_name").to_string(),
            phone: cell(&row, &positions, "phone").to_string(),
            last_result: cell(&row, &positions, "CallRecordLastResult-phone").to_string(),
            last_wrapup: cell(&row, &positions, "CallRecordLastAgentWrapup-phone").to_string(),
        });
    }

    Ok(records)
}

/// Load the daily export from a file path.
pub fn load_export_path<P: AsRef<Path>>(path: P) -> Result<Vec<InputRecord>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("failed to open export file: {:?}", path.as_ref()))?;
    load_export(file)
}

// ============================================================================
// TESTS
// ============================================================================

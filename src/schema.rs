// 📐 Shape Layer - Tabular schema validation
// Normalizes header cells and checks required columns before any row is typed

use std::collections::HashMap;
use std::fmt;

// ============================================================================
// HEADER NORMALIZATION
// ============================================================================

/// Normalize a raw header cell before column matching.
/// Strips byte-order marks, surrounding whitespace and surrounding quotes,
/// in that order (quote-stripping last, matching the export tooling).
pub fn normalize_header(raw: &str) -> String {
    raw.replace('\u{feff}', "")
        .trim()
        .trim_matches('"')
        .trim_matches('\'')
        .to_string()
}

/// Map normalized header names to their column positions.
/// First occurrence wins when a header repeats.
pub fn header_positions(headers: &csv::StringRecord) -> HashMap<String, usize> {
    let mut positions = HashMap::new();
    for (i, cell) in headers.iter().enumerate() {
        positions.entry(normalize_header(cell)).or_insert(i);
    }
    positions
}

/// Read one cell by normalized column name, empty when the row is short.
pub fn cell<'a>(
    row: &'a csv::StringRecord,
    positions: &HashMap<String, usize>,
    name: &str,
) -> &'a str {
    positions
        .get(name)
        .and_then(|&i| row.get(i))
        .unwrap_or("")
}

/// Check that every required column is present, returning the position map.
pub fn require_columns(
    headers: &csv::StringRecord,
    required: &[&str],
    table: &'static str,
) -> Result<HashMap<String, usize>, SchemaError> {
    let positions = header_positions(headers);

    let missing: Vec<String> = required
        .iter()
        .filter(|name| !positions.contains_key(**name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(positions)
    } else {
        Err(SchemaError { table, missing })
    }
}

// ============================================================================
// ERROR KINDS
// ============================================================================

/// A required column is absent from an input table. Fatal to the run.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// Which table failed ("export" or "ledger")
    pub table: &'static str,

    /// The required columns that were not found
    pub missing: Vec<String>,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} table is missing required columns: {}",
            self.table,
            self.missing.join(", ")
        )
    }
}

impl std::error::Error for SchemaError {}

/// The ledger contains values that cannot be typed (bad dates or ids).
/// Reported as a count; never recovered from partially.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerValidationError {
    /// Which field(s) failed to parse
    pub field: &'static str,

    /// How many rows carried an unparseable value
    pub invalid_rows: usize,
}

impl fmt::Display for LedgerValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ledger has {} row(s) with invalid '{}' values",
            self.invalid_rows, self.field
        )
    }
}

impl std::error::Error for LedgerValidationError {}

// ============================================================================
// TESTS
// ============================================================================

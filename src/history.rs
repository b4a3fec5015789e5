// 🗃️ Cooldown Ledger - Append-only history of past selections
// Validated once at the boundary; entries are never mutated, only appended

use crate::schema::{cell, require_columns, LedgerValidationError};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Required ledger columns, in output order.
pub const LEDGER_COLUMNS: [&str; 5] = [
    "id",
    "inin_outbound_id",
    "borrower_id",
    "selected_at",
    "allowed_again_at",
];

/// Ledger dates are serialized as `YYYY-MM-DD`.
pub const LEDGER_DATE_FORMAT: &str = "%Y-%m-%d";

/// Dedup key of a ledger entry: (outbound_id, borrower_id, selected_at ISO).
pub type LedgerKey = (String, String, String);

// ============================================================================
// LEDGER ENTRY
// ============================================================================

/// One historical selection event.
/// The triple (outbound_id, borrower_id, selected_at) is unique across the
/// ledger; ids increase monotonically and are never reused.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub id: i64,

    #[serde(rename = "inin_outbound_id")]
    pub outbound_id: String,

    pub borrower_id: String,

    pub selected_at: NaiveDate,

    pub allowed_again_at: NaiveDate,
}

impl LedgerEntry {
    /// Dedup key with the date rendered in ledger format.
    pub fn key(&self) -> LedgerKey {
        (
            self.outbound_id.clone(),
            self.borrower_id.clone(),
            self.selected_at.format(LEDGER_DATE_FORMAT).to_string(),
        )
    }
}

// ============================================================================
// LEDGER
// ============================================================================

/// The validated cooldown ledger for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// No prior history. This is the first-run bootstrap case, not an error.
    pub fn empty() -> Self {
        Ledger { entries: Vec::new() }
    }

    /// Parse and validate a ledger snapshot from any reader.
    /// Missing columns fail with `SchemaError`; unparseable dates or ids
    /// fail with `LedgerValidationError` carrying the invalid-row count.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = rdr.headers().context("failed to read ledger header row")?.clone();
        let positions = require_columns(&headers, &LEDGER_COLUMNS, "ledger")?;

        let mut invalid_dates = 0usize;
        let mut invalid_ids = 0usize;
        let mut entries = Vec::new();

        for row in rdr.records() {
            let row = row.context("failed to read ledger row")?;
            let selected_at = parse_ledger_date(cell(&row, &positions, "selected_at").trim());
            let allowed_again_at =
                parse_ledger_date(cell(&row, &positions, "allowed_again_at").trim());
            if selected_at.is_none() {
                invalid_dates += 1;
            }
            if allowed_again_at.is_none() {
                invalid_dates += 1;
            }

            let id = cell(&row, &positions, "id").trim().parse::<i64>().ok();
            if id.is_none() {
                invalid_ids += 1;
            }

            if let (Some(id), Some(selected_at), Some(allowed_again_at)) =
                (id, selected_at, allowed_again_at)
            {
                entries.push(LedgerEntry {
                    id,
                    outbound_id: cell(&row, &positions, "inin_outbound_id").trim().to_string(),
                    borrower_id: cell(&row, &positions, "borrower_id").trim().to_string(),
                    selected_at,
                    allowed_again_at,
                });
            }
        }

        if invalid_dates > 0 {
            return Err(LedgerValidationError {
                field: "selected_at/allowed_again_at",
                invalid_rows: invalid_dates,
            }
            .into());
        }
        if invalid_ids > 0 {
            return Err(LedgerValidationError {
                field: "id",
                invalid_rows: invalid_ids,
            }
            .into());
        }

        Ok(Ledger { entries })
    }

    /// Parse and validate a ledger snapshot from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())
            .with_context(|| format!("failed to open ledger file: {:?}", path.as_ref()))?;
        Self::from_reader(file)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrowers still in cooldown: `allowed_again_at` strictly after today.
    /// A borrower whose window ends today may be selected again today.
    pub fn blocked_borrowers(&self, today: NaiveDate) -> HashSet<String> {
        self.entries
            .iter()
            .filter(|e| e.allowed_again_at > today)
            .map(|e| e.borrower_id.clone())
            .collect()
    }

    /// Highest surrogate id present, 0 for an empty ledger.
    pub fn max_id(&self) -> i64 {
        self.entries.iter().map(|e| e.id).max().unwrap_or(0)
    }

    /// All dedup keys present in the ledger.
    pub fn keys(&self) -> HashSet<LedgerKey> {
        self.entries.iter().map(LedgerEntry::key).collect()
    }
}

fn parse_ledger_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, LEDGER_DATE_FORMAT).ok()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LedgerValidationError;

    const HEADER: &str = "id,inin_outbound_id,borrower_id,selected_at,allowed_again_at";

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date")
    }

    #[test]
    fn test_load_valid_ledger() {
        let csv = format!(
            "{}\n1,ob-1, b-1 ,2026-08-10,2026-08-17\n2,ob-2,b-2,2026-08-12,2026-08-19\n",
            HEADER
        );
        let ledger = Ledger::from_reader(csv.as_bytes()).expect("valid ledger");

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.entries[0].borrower_id, "b-1");
        assert_eq!(ledger.entries[0].selected_at, date("2026-08-10"));
        assert_eq!(ledger.max_id(), 2);
    }

    #[test]
    fn test_missing_columns_is_schema_error() {
        let csv = "id,borrower_id\n1,b-1\n";
        let err = Ledger::from_reader(csv.as_bytes()).expect_err("schema error");

        assert!(err.to_string().contains("inin_outbound_id"));
        assert!(err.to_string().contains("selected_at"));
    }

    #[test]
    fn test_invalid_dates_counted_and_fatal() {
        let csv = format!(
            "{}\n1,ob-1,b-1,not-a-date,2026-08-17\n2,ob-2,b-2,2026-08-12,also-bad\n",
            HEADER
        );
        let err = Ledger::from_reader(csv.as_bytes()).expect_err("validation error");
        let validation = err
            .downcast_ref::<LedgerValidationError>()
            .expect("ledger validation error");

        assert_eq!(validation.invalid_rows, 2);
        assert!(validation.to_string().contains("2 row(s)"));
    }

    #[test]
    fn test_invalid_id_counted_and_fatal() {
        let csv = format!("{}\nabc,ob-1,b-1,2026-08-10,2026-08-17\n", HEADER);
        let err = Ledger::from_reader(csv.as_bytes()).expect_err("validation error");
        let validation = err
            .downcast_ref::<LedgerValidationError>()
            .expect("ledger validation error");

        assert_eq!(validation.field, "id");
        assert_eq!(validation.invalid_rows, 1);
    }

    #[test]
    fn test_empty_ledger_has_no_blocks_and_zero_max_id() {
        let ledger = Ledger::empty();

        assert!(ledger.is_empty());
        assert_eq!(ledger.max_id(), 0);
        assert!(ledger.blocked_borrowers(date("2026-08-24")).is_empty());
    }

    #[test]
    fn test_cooldown_boundary_is_strict() {
        let csv = format!(
            "{}\n1,ob-1,past,2026-08-10,2026-08-23\n\
             2,ob-2,today,2026-08-17,2026-08-24\n\
             3,ob-3,tomorrow,2026-08-18,2026-08-25\n",
            HEADER
        );
        let ledger = Ledger::from_reader(csv.as_bytes()).expect("valid ledger");
        let blocked = ledger.blocked_borrowers(date("2026-08-24"));

        assert!(!blocked.contains("past"));
        assert!(!blocked.contains("today"));
        assert!(blocked.contains("tomorrow"));
    }

    #[test]
    fn test_key_uses_iso_date() {
        let entry = LedgerEntry {
            id: 1,
            outbound_id: "ob-1".to_string(),
            borrower_id: "b-1".to_string(),
            selected_at: date("2026-08-24"),
            allowed_again_at: date("2026-08-31"),
        };

        assert_eq!(
            entry.key(),
            (
                "ob-1".to_string(),
                "b-1".to_string(),
                "2026-08-24".to_string()
            )
        );
    }
}

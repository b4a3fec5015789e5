// 📤 Artifact Writers - CSV encodings of the three run outputs
// Thin wrappers around the pipeline; packaging (zip, Excel) lives elsewhere

use crate::audit::{AuditRow, AUDIT_COLUMNS};
use crate::campaign::CampaignRecord;
use crate::history::{LedgerEntry, LEDGER_COLUMNS};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Campaign file: no header row, ready for WhatsApp upload.
pub fn write_campaign<W: Write>(writer: W, rows: &[CampaignRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for row in rows {
        wtr.serialize(row).context("failed to write campaign row")?;
    }
    wtr.flush().context("failed to flush campaign output")?;
    Ok(())
}

/// Updated ledger: header row, dates as `YYYY-MM-DD`.
pub fn write_ledger<W: Write>(writer: W, entries: &[LedgerEntry]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(LEDGER_COLUMNS)
        .context("failed to write ledger header")?;
    for entry in entries {
        wtr.serialize(entry).context("failed to write ledger row")?;
    }
    wtr.flush().context("failed to flush ledger output")?;
    Ok(())
}

/// Audit file: header row, one row per input record.
pub fn write_audit<W: Write>(writer: W, rows: &[AuditRow]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(AUDIT_COLUMNS)
        .context("failed to write audit header")?;
    for row in rows {
        wtr.serialize(row).context("failed to write audit row")?;
    }
    wtr.flush().context("failed to flush audit output")?;
    Ok(())
}

/// Header-only ledger CSV, handed out so operators bootstrap a first run
/// with the right columns.
pub fn write_ledger_template<W: Write>(writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(LEDGER_COLUMNS)
        .context("failed to write ledger template header")?;
    wtr.flush().context("failed to flush ledger template")?;
    Ok(())
}

fn create_file(path: &Path) -> Result<std::fs::File> {
    std::fs::File::create(path).with_context(|| format!("failed to create output file: {:?}", path))
}

pub fn write_campaign_path<P: AsRef<Path>>(path: P, rows: &[CampaignRecord]) -> Result<()> {
    write_campaign(create_file(path.as_ref())?, rows)
}

pub fn write_ledger_path<P: AsRef<Path>>(path: P, entries: &[LedgerEntry]) -> Result<()> {
    write_ledger(create_file(path.as_ref())?, entries)
}

pub fn write_audit_path<P: AsRef<Path>>(path: P, rows: &[AuditRow]) -> Result<()> {
    write_audit(create_file(path.as_ref())?, rows)
}

pub fn write_ledger_template_path<P: AsRef<Path>>(path: P) -> Result<()> {
    write_ledger_template(create_file(path.as_ref())?)
}

// ============================================================================
// TESTS
// ============================================================================

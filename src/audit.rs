// 🔍 Audit Projection - One traceable row per input record, selected or not
// Column names match the historical audit files; renames are load-bearing

use crate::filters::{DropReason, FilterOutcome};
use crate::input::InputRecord;
use crate::pipeline::RunContext;
use serde::Serialize;

/// Audit columns in output order, matching the serialized field renames.
pub const AUDIT_COLUMNS: [&str; 17] = [
    "source_filename",
    "campaign_run_at",
    "borrower_id",
    "inin_outbound_id",
    "full_name",
    "phone_raw",
    "phone_full",
    "phone_10",
    "first_name",
    "filter_cooldown_pass",
    "filter_result_pass",
    "filter_wrapup_pass",
    "filter_phone_pass",
    "is_selected_final",
    "drop_reason",
    "selected_at",
    "allowed_again_at",
];

/// Full filter trace for one input record.
/// One-to-one with the export, in export order; nothing is filtered out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRow {
    pub source_filename: String,

    pub campaign_run_at: String,

    pub borrower_id: String,

    #[serde(rename = "inin_outbound_id")]
    pub outbound_id: String,

    pub full_name: String,

    pub phone_raw: String,

    pub phone_full: String,

    #[serde(rename = "phone_10")]
    pub phone_ten: String,

    pub first_name: String,

    #[serde(rename = "filter_cooldown_pass")]
    pub cooldown_pass: bool,

    #[serde(rename = "filter_result_pass")]
    pub result_pass: bool,

    #[serde(rename = "filter_wrapup_pass")]
    pub wrapup_pass: bool,

    #[serde(rename = "filter_phone_pass")]
    pub phone_pass: bool,

    #[serde(rename = "is_selected_final")]
    pub selected: bool,

    pub drop_reason: DropReason,

    /// ISO date when selected, empty otherwise
    pub selected_at: String,

    /// ISO date when selected, empty otherwise
    pub allowed_again_at: String,
}

/// Assemble the audit trail for the whole run.
pub fn build_audit(
    records: &[InputRecord],
    outcomes: &[FilterOutcome],
    ctx: &RunContext,
) -> Vec<AuditRow> {
    let selected_at = ctx.today.to_string();
    let allowed_again_at = ctx.allowed_again().to_string();

    records
        .iter()
        .zip(outcomes)
        .map(|(record, outcome)| AuditRow {
            source_filename: ctx.source_filename.clone(),
            campaign_run_at: ctx.run_at.clone(),
            borrower_id: record.borrower_id.clone(),
            outbound_id: record.outbound_id.clone(),
            full_name: record.full_name.clone(),
            phone_raw: record.phone.clone(),
            phone_full: outcome.phone_full.clone(),
            phone_ten: outcome.phone_ten.clone(),
            first_name: outcome.first_name.clone(),
            cooldown_pass: outcome.cooldown_pass,
            result_pass: outcome.result_pass,
            wrapup_pass: outcome.wrapup_pass,
            phone_pass: outcome.phone_pass,
            selected: outcome.selected,
            drop_reason: outcome.drop_reason,
            selected_at: if outcome.selected {
                selected_at.clone()
            } else {
                String::new()
            },
            allowed_again_at: if outcome.selected {
                allowed_again_at.clone()
            } else {
                String::new()
            },
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

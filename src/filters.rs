// 🏷️ Filter Pipeline - Four pass/fail predicates + priority-ordered drop reason
// Every predicate is computed in full for every record so the audit trail
// is complete; only the drop reason is priority-ordered

use crate::input::InputRecord;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Wrapup dispositions that keep a record eligible (compared trimmed+lowercased).
pub const ALLOWED_WRAPUPS: [&str; 4] = [
    "call back",
    "reject the call",
    "i dont need money",
    "i don't need money",
];

/// Last-call results are eligible when empty or carrying this prefix.
pub const RESULT_PREFIX: &str = "ININ-OUTBOUND";

/// Days a selected borrower stays blocked.
pub const COOLDOWN_DAYS: i64 = 7;

/// Outbound phone numbers must normalize to exactly this many digits.
pub const PHONE_DIGITS: usize = 10;

// ============================================================================
// DROP REASON
// ============================================================================

/// Why a record was dropped, or `Selected` when it qualified.
/// Priority order is a contract: a record failing several filters reports
/// the first failing one (cooldown → result → wrapup → invalid_phone).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    Selected,
    Cooldown,
    Result,
    Wrapup,
    InvalidPhone,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::Selected => "selected",
            DropReason::Cooldown => "cooldown",
            DropReason::Result => "result",
            DropReason::Wrapup => "wrapup",
            DropReason::InvalidPhone => "invalid_phone",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FILTER OUTCOME
// ============================================================================

/// Per-record result of the filter pipeline.
/// Carries the normalized phone forms and first name so the campaign and
/// audit projections share one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// True when the borrower is NOT in cooldown
    pub cooldown_pass: bool,

    /// True when the last call result is empty or outbound-dialer generated
    pub result_pass: bool,

    /// True when the wrapup is empty or in the allow-set
    pub wrapup_pass: bool,

    /// True when the phone normalizes to exactly 10 digits
    pub phone_pass: bool,

    /// AND of the four predicates
    pub selected: bool,

    pub drop_reason: DropReason,

    /// Phone with every non-digit stripped
    pub phone_full: String,

    /// Last 10 digits of `phone_full` (shorter when not enough digits)
    pub phone_ten: String,

    pub first_name: String,
}

// ============================================================================
// NORMALIZATION HELPERS
// ============================================================================

/// Strip every non-digit character.
pub fn normalize_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Last 10 digits of an already-normalized digit string.
pub fn last_ten_digits(digits: &str) -> String {
    if digits.len() <= PHONE_DIGITS {
        digits.to_string()
    } else {
        digits[digits.len() - PHONE_DIGITS..].to_string()
    }
}

/// First whitespace-separated token of a full name, empty when absent.
pub fn first_name(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string()
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Evaluate one record against the shared cooldown set.
/// Pure: no clock reads, no I/O; the cooldown set is computed once per run.
pub fn evaluate(record: &InputRecord, blocked: &HashSet<String>) -> FilterOutcome {
    let cooldown_pass = !blocked.contains(record.borrower_id.trim());

    let result_pass =
        record.last_result.is_empty() || record.last_result.starts_with(RESULT_PREFIX);

    let wrapup = record.last_wrapup.trim().to_lowercase();
    let wrapup_pass = wrapup.is_empty() || ALLOWED_WRAPUPS.contains(&wrapup.as_str());

    let phone_full = normalize_digits(&record.phone);
    let phone_ten = last_ten_digits(&phone_full);
    let phone_pass = phone_ten.len() == PHONE_DIGITS;

    let selected = cooldown_pass && result_pass && wrapup_pass && phone_pass;

    // Ordered (predicate, reason) pairs; first failure wins.
    let priority = [
        (cooldown_pass, DropReason::Cooldown),
        (result_pass, DropReason::Result),
        (wrapup_pass, DropReason::Wrapup),
        (phone_pass, DropReason::InvalidPhone),
    ];
    let drop_reason = priority
        .iter()
        .find(|(pass, _)| !pass)
        .map(|&(_, reason)| reason)
        .unwrap_or(DropReason::Selected);

    FilterOutcome {
        cooldown_pass,
        result_pass,
        wrapup_pass,
        phone_pass,
        selected,
        drop_reason,
        phone_full,
        phone_ten,
        first_name: first_name(&record.full_name),
    }
}

// ============================================================================
// TESTS
// ============================================================================

// Campaign Selector - Core Library
// Selects borrowers from the daily call-center export for WhatsApp outreach
// and maintains the 7-day cooldown ledger across runs

pub mod schema;         // Header normalization + schema/validation errors
pub mod input;          // Daily export loader
pub mod history;        // Cooldown ledger: load, validate, query
pub mod filters;        // Four predicates + priority-ordered drop reason
pub mod campaign;       // Selected records → WhatsApp campaign rows
pub mod reconciliation; // Merge selections into the ledger, assign ids
pub mod audit;          // Per-record filter trace
pub mod pipeline;       // One-pass run orchestration + summary counters
pub mod output;         // CSV writers for the three artifacts

// Re-export commonly used types
pub use audit::{build_audit, AuditRow, AUDIT_COLUMNS};
pub use campaign::{project_campaign, CampaignRecord, COUNTRY_CODE};
pub use filters::{
    evaluate, first_name, last_ten_digits, normalize_digits, DropReason, FilterOutcome,
    ALLOWED_WRAPUPS, COOLDOWN_DAYS, PHONE_DIGITS, RESULT_PREFIX,
};
pub use history::{Ledger, LedgerEntry, LedgerKey, LEDGER_COLUMNS, LEDGER_DATE_FORMAT};
pub use input::{load_export, load_export_path, InputRecord, REQUIRED_EXPORT_COLUMNS};
pub use output::{
    write_audit, write_audit_path, write_campaign, write_campaign_path, write_ledger,
    write_ledger_path, write_ledger_template, write_ledger_template_path,
};
pub use pipeline::{run, RunContext, RunOutputs, RunSummary, CAMPAIGN_UTC_OFFSET_HOURS};
pub use reconciliation::{reconcile, Reconciliation};
pub use schema::{normalize_header, require_columns, LedgerValidationError, SchemaError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

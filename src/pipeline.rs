// 🧮 Run Orchestration - One pass over the export produces all three artifacts
// The clock is read once and threaded explicitly; the run itself is pure

use crate::audit::{build_audit, AuditRow};
use crate::campaign::{project_campaign, CampaignRecord};
use crate::filters::{evaluate, DropReason, FilterOutcome, COOLDOWN_DAYS};
use crate::history::{Ledger, LedgerEntry};
use crate::input::InputRecord;
use crate::reconciliation::reconcile;
use chrono::{Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

/// Campaign time zone as a fixed UTC offset, in hours.
/// America/Mexico_City, which no longer observes DST. Changing deployment
/// region means changing this constant; the strict `allowed_again_at > today`
/// comparison and the 7-day window must stay as they are.
pub const CAMPAIGN_UTC_OFFSET_HOURS: i32 = -6;

fn campaign_zone() -> FixedOffset {
    FixedOffset::east_opt(CAMPAIGN_UTC_OFFSET_HOURS * 3600)
        .expect("CAMPAIGN_UTC_OFFSET_HOURS is a valid UTC offset")
}

// ============================================================================
// RUN CONTEXT
// ============================================================================

/// Clock and provenance values captured once at run start.
/// Every component sees the same "today" so the cooldown cutoff is
/// consistent across all records of one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub today: NaiveDate,

    /// Run timestamp, `YYYY-MM-DD HH:MM:SS`, for audit provenance
    pub run_at: String,

    /// `dd-mm-yyyy` token used in artifact file names
    pub run_date: String,

    /// `HHMM` token used in the audit file name
    pub run_hhmm: String,

    /// Name of the export file this run consumed
    pub source_filename: String,
}

impl RunContext {
    /// Capture the current wall clock in the campaign time zone.
    pub fn now(source_filename: &str) -> Self {
        let now = Utc::now().with_timezone(&campaign_zone());
        RunContext {
            today: now.date_naive(),
            run_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            run_date: now.format("%d-%m-%Y").to_string(),
            run_hhmm: now.format("%H%M").to_string(),
            source_filename: source_filename.to_string(),
        }
    }

    /// Fixed date, midnight timestamp. For deterministic runs and tests.
    pub fn for_date(today: NaiveDate, source_filename: &str) -> Self {
        RunContext {
            today,
            run_at: format!("{} 00:00:00", today),
            run_date: today.format("%d-%m-%Y").to_string(),
            run_hhmm: "0000".to_string(),
            source_filename: source_filename.to_string(),
        }
    }

    /// End of the cooldown window opened by a selection today.
    pub fn allowed_again(&self) -> NaiveDate {
        self.today + Duration::days(COOLDOWN_DAYS)
    }
}

// ============================================================================
// RUN SUMMARY
// ============================================================================

/// Stage-by-stage counters for one run. Cascade semantics: each `removed_*`
/// counts records that survived every earlier stage and failed this one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_input: usize,
    pub removed_cooldown: usize,
    pub removed_result: usize,
    pub removed_wrapup: usize,
    pub removed_phone: usize,
    pub selected: usize,
    pub new_ledger_entries: usize,
    pub campaign_records: usize,
}

fn summarize(outcomes: &[FilterOutcome], new_ledger_entries: usize, campaign_records: usize) -> RunSummary {
    let reason_count =
        |reason: DropReason| outcomes.iter().filter(|o| o.drop_reason == reason).count();

    RunSummary {
        total_input: outcomes.len(),
        removed_cooldown: reason_count(DropReason::Cooldown),
        removed_result: reason_count(DropReason::Result),
        removed_wrapup: reason_count(DropReason::Wrapup),
        removed_phone: reason_count(DropReason::InvalidPhone),
        selected: outcomes.iter().filter(|o| o.selected).count(),
        new_ledger_entries,
        campaign_records,
    }
}

// ============================================================================
// RUN OUTPUTS
// ============================================================================

/// Everything one run produces. Either all of it exists or the run failed
/// earlier, while loading inputs; there is no partial output state.
#[derive(Debug, Clone)]
pub struct RunOutputs {
    pub campaign: Vec<CampaignRecord>,
    pub ledger: Vec<LedgerEntry>,
    pub audit: Vec<AuditRow>,
    pub summary: RunSummary,
}

/// Run the whole pipeline over already-validated inputs.
/// Infallible by construction: schema and ledger validation happened at load.
pub fn run(records: &[InputRecord], ledger: &Ledger, ctx: &RunContext) -> RunOutputs {
    let blocked = ledger.blocked_borrowers(ctx.today);
    let outcomes: Vec<FilterOutcome> = records.iter().map(|r| evaluate(r, &blocked)).collect();

    let campaign = project_campaign(records, &outcomes);
    let reconciliation = reconcile(ledger, records, &outcomes, ctx.today);
    let audit = build_audit(records, &outcomes, ctx);
    let summary = summarize(&outcomes, reconciliation.new_entries, campaign.len());

    RunOutputs {
        campaign,
        ledger: reconciliation.combined,
        audit,
        summary,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Ledger;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date")
    }

    fn record(
        outbound_id: &str,
        borrower_id: &str,
        phone: &str,
        result: &str,
        wrapup: &str,
    ) -> InputRecord {
        InputRecord {
            outbound_id: outbound_id.to_string(),
            borrower_id: borrower_id.to_string(),
            full_name: "Maria Lopez".to_string(),
            phone: phone.to_string(),
            last_result: result.to_string(),
            last_wrapup: wrapup.to_string(),
        }
    }

    fn ledger_csv(rows: &str) -> Ledger {
        let csv = format!(
            "id,inin_outbound_id,borrower_id,selected_at,allowed_again_at\n{}",
            rows
        );
        Ledger::from_reader(csv.as_bytes()).expect("valid test ledger")
    }

    #[test]
    fn test_end_to_end_two_record_scenario() {
        // One fresh record, one borrower still in cooldown until tomorrow.
        let records = vec![
            record("ob-1", "b-fresh", "5512345678", "", "call back"),
            record("ob-2", "b-blocked", "5599887766", "", ""),
        ];
        let ledger = ledger_csv("1,ob-0,b-blocked,2026-08-18,2026-08-25\n");
        let ctx = RunContext::for_date(date("2026-08-24"), "export.csv");

        let outputs = run(&records, &ledger, &ctx);

        assert_eq!(outputs.campaign.len(), 1);
        assert_eq!(outputs.campaign[0].phone, "5512345678");

        assert_eq!(outputs.summary.new_ledger_entries, 1);
        assert_eq!(outputs.ledger.len(), 2);
        assert_eq!(outputs.ledger[1].borrower_id, "b-fresh");
        assert_eq!(outputs.ledger[1].id, 2);

        assert_eq!(outputs.audit.len(), 2);
        assert_eq!(outputs.audit[0].drop_reason, DropReason::Selected);
        assert_eq!(outputs.audit[1].drop_reason, DropReason::Cooldown);
    }

    #[test]
    fn test_summary_cascade_counters() {
        let records = vec![
            record("ob-1", "b-blocked", "bad-phone", "", ""), // cooldown wins over phone
            record("ob-2", "b-2", "5511111111", "AGENT-ANSWERED", ""), // result
            record("ob-3", "b-3", "5522222222", "", "not interested"), // wrapup
            record("ob-4", "b-4", "123", "", ""),             // phone
            record("ob-5", "b-5", "5533333333", "", "Call Back"), // selected
        ];
        let ledger = ledger_csv("1,ob-0,b-blocked,2026-08-20,2026-08-27\n");
        let ctx = RunContext::for_date(date("2026-08-24"), "export.csv");

        let summary = run(&records, &ledger, &ctx).summary;

        assert_eq!(
            summary,
            RunSummary {
                total_input: 5,
                removed_cooldown: 1,
                removed_result: 1,
                removed_wrapup: 1,
                removed_phone: 1,
                selected: 1,
                new_ledger_entries: 1,
                campaign_records: 1,
            }
        );
    }

    #[test]
    fn test_second_run_over_same_export_adds_nothing() {
        let records = vec![
            record("ob-1", "b-1", "5512345678", "", ""),
            record("ob-2", "b-2", "5599887766", "", ""),
        ];
        let ctx = RunContext::for_date(date("2026-08-24"), "export.csv");

        let first = run(&records, &Ledger::empty(), &ctx);
        assert_eq!(first.summary.new_ledger_entries, 2);

        // Same export, same day, starting from the ledger the first run wrote.
        let ledger_after_first = Ledger {
            entries: first.ledger.clone(),
        };
        let second = run(&records, &ledger_after_first, &ctx);

        // Selected records are now in cooldown, and even if the cutoff let
        // them through the reconciler would drop the duplicate keys.
        assert_eq!(second.summary.new_ledger_entries, 0);
        assert_eq!(second.ledger, first.ledger);
    }

    #[test]
    fn test_cooldown_expiry_day_allows_reselection() {
        let records = vec![record("ob-1", "b-1", "5512345678", "", "")];
        let ledger = ledger_csv("1,ob-0,b-1,2026-08-17,2026-08-24\n");
        let ctx = RunContext::for_date(date("2026-08-24"), "export.csv");

        let outputs = run(&records, &ledger, &ctx);

        assert_eq!(outputs.summary.selected, 1);
        assert_eq!(outputs.summary.new_ledger_entries, 1);
    }

    #[test]
    fn test_empty_export_yields_empty_artifacts() {
        let ctx = RunContext::for_date(date("2026-08-24"), "export.csv");
        let outputs = run(&[], &Ledger::empty(), &ctx);

        assert!(outputs.campaign.is_empty());
        assert!(outputs.ledger.is_empty());
        assert!(outputs.audit.is_empty());
        assert_eq!(outputs.summary, RunSummary::default());
    }

    #[test]
    fn test_run_context_tokens() {
        let ctx = RunContext::for_date(date("2026-08-24"), "export.csv");

        assert_eq!(ctx.run_date, "24-08-2026");
        assert_eq!(ctx.run_hhmm, "0000");
        assert_eq!(ctx.allowed_again(), date("2026-08-31"));
    }
}

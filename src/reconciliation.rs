// ⚖️ Ledger Reconciler - Merge this run's selections into the cooldown ledger
// Idempotent across runs: re-processing the same export adds nothing

use crate::filters::{FilterOutcome, COOLDOWN_DAYS};
use crate::history::{Ledger, LedgerEntry, LedgerKey};
use crate::input::InputRecord;
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Result of merging one run's selections into the ledger.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Existing entries followed by this run's new entries, deduplicated
    pub combined: Vec<LedgerEntry>,

    /// How many entries this run actually added
    pub new_entries: usize,
}

fn candidate_key(record: &InputRecord, today: NaiveDate) -> LedgerKey {
    (
        record.outbound_id.clone(),
        record.borrower_id.clone(),
        today.to_string(),
    )
}

/// Merge the selected records into the existing ledger.
///
/// 1. One candidate per selected record, keyed (outbound_id, borrower_id, today).
/// 2. In-run duplicates collapse to the first occurrence.
/// 3. Candidates whose key already exists in the ledger are dropped.
/// 4. Ids continue from max(existing) + 1, in surviving-candidate order.
/// 5. Appended entries pass one final key dedup together with the existing set.
pub fn reconcile(
    ledger: &Ledger,
    records: &[InputRecord],
    outcomes: &[FilterOutcome],
    today: NaiveDate,
) -> Reconciliation {
    let existing_keys = ledger.keys();
    let allowed_again_at = today + Duration::days(COOLDOWN_DAYS);

    let mut run_keys: HashSet<LedgerKey> = HashSet::new();
    let mut survivors: Vec<&InputRecord> = Vec::new();

    for (record, outcome) in records.iter().zip(outcomes) {
        if !outcome.selected {
            continue;
        }
        let key = candidate_key(record, today);
        if !run_keys.insert(key.clone()) {
            continue; // duplicate within this run
        }
        if existing_keys.contains(&key) {
            continue; // already in the ledger from a prior run
        }
        survivors.push(record);
    }

    let mut next_id = ledger.max_id() + 1;
    let new_entries: Vec<LedgerEntry> = survivors
        .into_iter()
        .map(|record| {
            let entry = LedgerEntry {
                id: next_id,
                outbound_id: record.outbound_id.clone(),
                borrower_id: record.borrower_id.clone(),
                selected_at: today,
                allowed_again_at,
            };
            next_id += 1;
            entry
        })
        .collect();
    let added = new_entries.len();

    // Final consistency guard: the combined set stays key-unique, first wins.
    let mut seen: HashSet<LedgerKey> = HashSet::new();
    let mut combined = Vec::with_capacity(ledger.len() + added);
    for entry in ledger.entries.iter().cloned().chain(new_entries) {
        if seen.insert(entry.key()) {
            combined.push(entry);
        }
    }

    Reconciliation {
        combined,
        new_entries: added,
    }
}

// ============================================================================
// TESTS
// ============================================================================

// 📣 Campaign Projection - Selected records → WhatsApp upload rows

use crate::filters::FilterOutcome;
use crate::input::InputRecord;
use serde::Serialize;

/// Country code prefixed to every campaign row.
pub const COUNTRY_CODE: &str = "52";

/// One row of the outbound WhatsApp campaign file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRecord {
    pub country_code: String,

    /// Normalized 10-digit phone
    pub phone: String,

    /// May be empty when the export carried no name
    pub first_name: String,
}

/// Project selected records into campaign rows, preserving input order.
/// Zero selected records is a valid (empty) campaign.
pub fn project_campaign(records: &[InputRecord], outcomes: &[FilterOutcome]) -> Vec<CampaignRecord> {
    records
        .iter()
        .zip(outcomes)
        .filter(|(_, outcome)| outcome.selected)
        .map(|(_, outcome)| CampaignRecord {
            country_code: COUNTRY_CODE.to_string(),
            phone: outcome.phone_ten.clone(),
            first_name: outcome.first_name.clone(),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

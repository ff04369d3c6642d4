// Campaign grading engine.
//
// The pipeline is a single synchronous pass over an uploaded table:
// - `validate` checks the header for the required columns,
// - `metrics` derives the per-campaign ratios,
// - `ranking` turns four of them into a weighted 0–100 score,
// - `report` sorts the result and extracts the best and worst campaigns.
//
// `insights` is an optional collaborator that only ever sees the extract.
pub mod config;
pub mod error;
pub mod insights;
pub mod loader;
pub mod metrics;
pub mod output;
pub mod ranking;
pub mod report;
pub mod types;
pub mod util;
pub mod validate;

use error::GradeError;
use ranking::ScoringConfig;
use tracing::info;
use types::{CampaignTable, ScoredTable};

/// Derive, rank and sort a loaded table. Reruns from scratch on every call,
/// so the same input always yields the same table.
pub fn grade(table: CampaignTable, scoring: &ScoringConfig) -> Result<ScoredTable, GradeError> {
    scoring.validate()?;
    validate::validate_columns(&table.headers)?;
    if table.records.is_empty() {
        return Err(GradeError::EmptyDataset);
    }

    let derived = metrics::derive_all(&table.records);
    let scored = ranking::score_campaigns(table.records, derived, scoring);
    let graded = report::build_table(table.headers, scored);
    info!(
        campaigns = graded.campaigns.len(),
        criteria = scoring.criteria.len(),
        "graded campaigns"
    );
    Ok(graded)
}

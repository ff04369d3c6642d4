use crate::error::GradeError;
use crate::types::{
    CampaignRecord, CampaignTable, RawRow, COL_LEADS, COL_REVENUE, COL_SALES, COL_SPEND,
};
use crate::util::{decode_text, parse_f64_cell};
use crate::validate::validate_columns;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info};

/// Read, decode and parse a campaign CSV from disk.
pub fn load_campaigns(path: &Path) -> Result<CampaignTable, GradeError> {
    let bytes = std::fs::read(path)?;
    if std::str::from_utf8(&bytes).is_err() {
        debug!(path = %path.display(), "input is not valid UTF-8, reading as Latin-1");
    }
    let table = parse_campaigns(&decode_text(bytes))?;
    info!(
        path = %path.display(),
        rows = table.records.len(),
        columns = table.headers.len(),
        "loaded campaign data"
    );
    Ok(table)
}

/// Parse already-decoded CSV text.
///
/// The header is validated before any row is read. A non-numeric value in a
/// numeric column aborts the whole load; empty numeric cells become `None`.
pub fn parse_campaigns(text: &str) -> Result<CampaignTable, GradeError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());
    let headers = rdr.headers()?.clone();
    validate_columns(&headers)?;

    let mut records = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row_no = idx + 1;
        let source = result?;
        let row: RawRow = source.deserialize(Some(&headers))?;

        let numeric = |value: Option<&str>, column: &'static str| {
            parse_f64_cell(value).map_err(|value| GradeError::MalformedInput {
                row: row_no,
                column,
                value,
            })
        };
        let total_spend = numeric(row.total_spend.as_deref(), COL_SPEND)?;
        let total_leads = numeric(row.total_leads.as_deref(), COL_LEADS)?;
        let total_sales = numeric(row.total_sales.as_deref(), COL_SALES)?;
        let revenue = numeric(row.revenue.as_deref(), COL_REVENUE)?;

        records.push(CampaignRecord {
            name: row.campaign.unwrap_or_default().trim().to_string(),
            total_spend,
            total_leads,
            total_sales,
            revenue,
            source,
        });
    }

    if records.is_empty() {
        return Err(GradeError::EmptyDataset);
    }
    Ok(CampaignTable { headers, records })
}

use crate::types::{
    ExtractEntry, Highlights, RunSummary, ScoreRow, ScoredCampaign, ScoredTable,
};
use crate::util::{format_optional, score_bar};
use chrono::Utc;
use csv::StringRecord;
use tracing::debug;

/// Sort by score, best first. The sort is stable, so equal scores keep their
/// input order.
pub fn sort_by_score(mut campaigns: Vec<ScoredCampaign>) -> Vec<ScoredCampaign> {
    campaigns.sort_by(|a, b| b.score.total_cmp(&a.score));
    campaigns
}

pub fn build_table(headers: StringRecord, campaigns: Vec<ScoredCampaign>) -> ScoredTable {
    let campaigns = sort_by_score(campaigns);
    if let (Some(best), Some(worst)) = (campaigns.first(), campaigns.last()) {
        debug!(
            best = %best.record.name,
            best_raw = best.raw_score,
            worst = %worst.record.name,
            worst_raw = worst.raw_score,
            "sorted scored campaigns"
        );
    }
    ScoredTable { headers, campaigns }
}

fn extract_entry(c: &ScoredCampaign) -> ExtractEntry {
    ExtractEntry {
        campaign: c.record.name.clone(),
        score: c.score,
        roi: c.metrics.roi,
        revenue: c.record.revenue,
        cpl: c.metrics.cpl,
        total_leads: c.record.total_leads,
    }
}

/// The first `size` campaigns followed by the last `size`.
///
/// Small tables are not de-duplicated: with fewer than `2 * size` rows the
/// two halves overlap and some campaigns appear twice.
pub fn top_and_bottom(table: &ScoredTable, size: usize) -> Vec<ExtractEntry> {
    let rows = &table.campaigns;
    let head = &rows[..size.min(rows.len())];
    let tail = &rows[rows.len().saturating_sub(size)..];
    head.iter().chain(tail).map(extract_entry).collect()
}

/// Best and worst campaign by name plus the top/bottom extract. `None` for an
/// empty table.
pub fn highlights(table: &ScoredTable, size: usize) -> Option<Highlights> {
    let best = table.campaigns.first()?;
    let worst = table.campaigns.last()?;
    Some(Highlights {
        best_campaign: best.record.name.clone(),
        worst_campaign: worst.record.name.clone(),
        extract: top_and_bottom(table, size),
    })
}

pub fn generate_summary(table: &ScoredTable, highlights: &Highlights) -> RunSummary {
    let (score_min, score_max) = table
        .campaigns
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(c.score), hi.max(c.score))
        });
    RunSummary {
        generated_at: Utc::now(),
        total_campaigns: table.campaigns.len(),
        best_campaign: highlights.best_campaign.clone(),
        worst_campaign: highlights.worst_campaign.clone(),
        score_min,
        score_max,
        extract: highlights.extract.clone(),
    }
}

/// Console rows for the preview table, best first.
pub fn score_rows(table: &ScoredTable) -> Vec<ScoreRow> {
    table
        .campaigns
        .iter()
        .map(|c| ScoreRow {
            campaign: c.record.name.clone(),
            total_spend: format_optional(c.record.total_spend),
            total_leads: format_optional(c.record.total_leads),
            total_sales: format_optional(c.record.total_sales),
            revenue: format_optional(c.record.revenue),
            profit_loss: format_optional(c.metrics.profit_loss),
            cpl: format_optional(c.metrics.cpl),
            cpa: format_optional(c.metrics.cpa),
            roas: format_optional(c.metrics.roas),
            roi: format_optional(c.metrics.roi),
            conversion_rate: format_optional(c.metrics.conversion_rate),
            revenue_per_lead: format_optional(c.metrics.revenue_per_lead),
            score: format_optional(Some(c.score)),
            score_bar: score_bar(c.score),
        })
        .collect()
}

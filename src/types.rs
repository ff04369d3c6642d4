use chrono::{DateTime, Utc};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

pub const COL_CAMPAIGN: &str = "Campaign";
pub const COL_SPEND: &str = "Total Spend";
pub const COL_LEADS: &str = "Total Leads";
pub const COL_SALES: &str = "Total Sales";
pub const COL_REVENUE: &str = "Revenue (incl. GST)";
pub const COL_SCORE: &str = "Campaign Score (0–100)";

/// Columns every uploaded dataset must carry, in the order they are reported.
pub const REQUIRED_COLUMNS: [&str; 5] = [COL_CAMPAIGN, COL_SPEND, COL_LEADS, COL_SALES, COL_REVENUE];

/// Columns appended to the export, after the original ones.
pub const DERIVED_COLUMNS: [&str; 8] = [
    "P/L",
    "CPL",
    "CPA",
    "ROAS",
    "ROI",
    "C-rate",
    "Rev. per lead",
    COL_SCORE,
];

/// Serde view of one input row. Only the required columns are read here;
/// anything else stays in the untouched source record.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Campaign")]
    pub campaign: Option<String>,
    #[serde(rename = "Total Spend")]
    pub total_spend: Option<String>,
    #[serde(rename = "Total Leads")]
    pub total_leads: Option<String>,
    #[serde(rename = "Total Sales")]
    pub total_sales: Option<String>,
    #[serde(rename = "Revenue (incl. GST)")]
    pub revenue: Option<String>,
}

/// One campaign as uploaded. Numeric cells that were left empty are `None`.
#[derive(Debug, Clone)]
pub struct CampaignRecord {
    pub name: String,
    pub total_spend: Option<f64>,
    pub total_leads: Option<f64>,
    pub total_sales: Option<f64>,
    pub revenue: Option<f64>,
    /// Every original cell of the row, exported verbatim.
    pub source: StringRecord,
}

/// A parsed upload: original header plus one record per data row, in file order.
#[derive(Debug, Clone)]
pub struct CampaignTable {
    pub headers: StringRecord,
    pub records: Vec<CampaignRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedMetrics {
    pub profit_loss: Option<f64>,
    pub cpl: Option<f64>,
    pub cpa: Option<f64>,
    pub roas: Option<f64>,
    pub roi: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub revenue_per_lead: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ScoredCampaign {
    pub record: CampaignRecord,
    pub metrics: DerivedMetrics,
    /// Weighted rank total; lower is better. Never exported.
    pub(crate) raw_score: f64,
    pub score: f64,
}

/// The graded dataset, best campaign first. Raw rank totals stay internal.
#[derive(Debug, Clone)]
pub struct ScoredTable {
    pub headers: StringRecord,
    pub campaigns: Vec<ScoredCampaign>,
}

/// Numeric columns a scoring criterion can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricColumn {
    #[serde(rename = "Total Spend")]
    TotalSpend,
    #[serde(rename = "Total Leads")]
    TotalLeads,
    #[serde(rename = "Total Sales")]
    TotalSales,
    #[serde(rename = "Revenue (incl. GST)")]
    Revenue,
    #[serde(rename = "P/L")]
    ProfitLoss,
    #[serde(rename = "CPL")]
    Cpl,
    #[serde(rename = "CPA")]
    Cpa,
    #[serde(rename = "ROAS")]
    Roas,
    #[serde(rename = "ROI")]
    Roi,
    #[serde(rename = "C-rate")]
    ConversionRate,
    #[serde(rename = "Rev. per lead")]
    RevenuePerLead,
}

impl MetricColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            MetricColumn::TotalSpend => COL_SPEND,
            MetricColumn::TotalLeads => COL_LEADS,
            MetricColumn::TotalSales => COL_SALES,
            MetricColumn::Revenue => COL_REVENUE,
            MetricColumn::ProfitLoss => "P/L",
            MetricColumn::Cpl => "CPL",
            MetricColumn::Cpa => "CPA",
            MetricColumn::Roas => "ROAS",
            MetricColumn::Roi => "ROI",
            MetricColumn::ConversionRate => "C-rate",
            MetricColumn::RevenuePerLead => "Rev. per lead",
        }
    }

    pub fn value(self, record: &CampaignRecord, metrics: &DerivedMetrics) -> Option<f64> {
        match self {
            MetricColumn::TotalSpend => record.total_spend,
            MetricColumn::TotalLeads => record.total_leads,
            MetricColumn::TotalSales => record.total_sales,
            MetricColumn::Revenue => record.revenue,
            MetricColumn::ProfitLoss => metrics.profit_loss,
            MetricColumn::Cpl => metrics.cpl,
            MetricColumn::Cpa => metrics.cpa,
            MetricColumn::Roas => metrics.roas,
            MetricColumn::Roi => metrics.roi,
            MetricColumn::ConversionRate => metrics.conversion_rate,
            MetricColumn::RevenuePerLead => metrics.revenue_per_lead,
        }
    }
}

/// Console rendering of a scored campaign. Figures are pre-formatted.
#[derive(Debug, Tabled, Clone)]
pub struct ScoreRow {
    #[tabled(rename = "Campaign")]
    pub campaign: String,
    #[tabled(rename = "Total Spend")]
    pub total_spend: String,
    #[tabled(rename = "Total Leads")]
    pub total_leads: String,
    #[tabled(rename = "Total Sales")]
    pub total_sales: String,
    #[tabled(rename = "Revenue (incl. GST)")]
    pub revenue: String,
    #[tabled(rename = "P/L")]
    pub profit_loss: String,
    #[tabled(rename = "CPL")]
    pub cpl: String,
    #[tabled(rename = "CPA")]
    pub cpa: String,
    #[tabled(rename = "ROAS")]
    pub roas: String,
    #[tabled(rename = "ROI")]
    pub roi: String,
    #[tabled(rename = "C-rate")]
    pub conversion_rate: String,
    #[tabled(rename = "Rev. per lead")]
    pub revenue_per_lead: String,
    #[tabled(rename = "Campaign Score (0–100)")]
    pub score: String,
    #[tabled(rename = "Score Bar")]
    pub score_bar: String,
}

/// One line of the top/bottom extract handed to the text-generation service.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ExtractEntry {
    pub campaign: String,
    pub score: f64,
    pub roi: Option<f64>,
    pub revenue: Option<f64>,
    pub cpl: Option<f64>,
    pub total_leads: Option<f64>,
}

/// Markdown row of the prompt table.
#[derive(Debug, Tabled, Clone)]
pub struct InsightRow {
    #[tabled(rename = "Campaign")]
    pub campaign: String,
    #[tabled(rename = "Campaign Score (0–100)")]
    pub score: String,
    #[tabled(rename = "ROI")]
    pub roi: String,
    #[tabled(rename = "Revenue (incl. GST)")]
    pub revenue: String,
    #[tabled(rename = "CPL")]
    pub cpl: String,
    #[tabled(rename = "Total Leads")]
    pub total_leads: String,
}

/// Everything the reporting stage exposes beyond the full table.
#[derive(Debug, Clone, Serialize)]
pub struct Highlights {
    pub best_campaign: String,
    pub worst_campaign: String,
    pub extract: Vec<ExtractEntry>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub total_campaigns: usize,
    pub best_campaign: String,
    pub worst_campaign: String,
    pub score_min: f64,
    pub score_max: f64,
    pub extract: Vec<ExtractEntry>,
}

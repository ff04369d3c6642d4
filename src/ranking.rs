// Weighted multi-criteria ranking.
//
// Each criterion ranks the whole column once (competition ranking, missing
// values last), the ranks are combined into a weighted total per campaign
// (lower is better), and the totals are min-max scaled onto 0–100 with the
// best total at 100.
use crate::error::GradeError;
use crate::types::{CampaignRecord, DerivedMetrics, MetricColumn, ScoredCampaign};
use crate::util::is_close;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "higher")]
    HigherIsBetter,
    #[serde(rename = "lower")]
    LowerIsBetter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub metric: MetricColumn,
    pub weight: f64,
    pub direction: Direction,
}

impl Criterion {
    pub fn new(metric: MetricColumn, weight: f64, direction: Direction) -> Self {
        Self { metric, weight, direction }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub criteria: Vec<Criterion>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            criteria: vec![
                Criterion::new(MetricColumn::Roi, 40.0, Direction::HigherIsBetter),
                Criterion::new(MetricColumn::Revenue, 30.0, Direction::HigherIsBetter),
                Criterion::new(MetricColumn::Cpl, 18.0, Direction::LowerIsBetter),
                Criterion::new(MetricColumn::TotalLeads, 12.0, Direction::HigherIsBetter),
            ],
        }
    }
}

impl ScoringConfig {
    pub fn total_weight(&self) -> f64 {
        self.criteria.iter().map(|c| c.weight).sum()
    }

    /// Reject criteria sets that cannot produce a meaningful ranking.
    /// Weights that do not add up to 100 are allowed but logged.
    pub fn validate(&self) -> Result<(), GradeError> {
        if self.criteria.is_empty() {
            return Err(GradeError::Config("at least one scoring criterion is required".into()));
        }
        if let Some(bad) = self
            .criteria
            .iter()
            .find(|c| !c.weight.is_finite() || c.weight < 0.0)
        {
            return Err(GradeError::Config(format!(
                "weight for '{}' must be a non-negative number, got {}",
                bad.metric.column_name(),
                bad.weight
            )));
        }
        let total = self.total_weight();
        if !is_close(total, 100.0) {
            warn!(total, "scoring weights do not sum to 100");
        }
        Ok(())
    }
}

fn rank_key(v: Option<f64>) -> Option<f64> {
    v.filter(|x| !x.is_nan())
}

fn compare(a: Option<f64>, b: Option<f64>, direction: Direction) -> Ordering {
    match (rank_key(a), rank_key(b)) {
        (Some(a), Some(b)) => match direction {
            Direction::HigherIsBetter => b.total_cmp(&a),
            Direction::LowerIsBetter => a.total_cmp(&b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn tied(a: Option<f64>, b: Option<f64>) -> bool {
    match (rank_key(a), rank_key(b)) {
        (Some(a), Some(b)) => a == b,
        (None, None) => true,
        _ => false,
    }
}

/// Competition ("min") ranking of a whole column. Rank 1 is the best value;
/// tied values share the best rank of their group and the next distinct
/// value skips past the group. Missing values tie with each other at the bottom.
///
/// Returned ranks are in input order.
pub fn competition_rank(values: &[Option<f64>], direction: Direction) -> Vec<usize> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| compare(values[a], values[b], direction));

    let mut ranks = vec![0usize; n];
    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && tied(values[order[start]], values[order[end + 1]]) {
            end += 1;
        }
        for &idx in &order[start..=end] {
            ranks[idx] = start + 1;
        }
        start = end + 1;
    }
    ranks
}

/// Weighted rank totals, one per campaign in input order. Lower is better.
pub fn weighted_rank_totals(
    records: &[CampaignRecord],
    metrics: &[DerivedMetrics],
    config: &ScoringConfig,
) -> Vec<f64> {
    let mut totals = vec![0.0f64; records.len()];
    for criterion in &config.criteria {
        let column: Vec<Option<f64>> = records
            .iter()
            .zip(metrics)
            .map(|(r, m)| criterion.metric.value(r, m))
            .collect();
        let ranks = competition_rank(&column, criterion.direction);
        debug!(
            metric = criterion.metric.column_name(),
            weight = criterion.weight,
            missing = column.iter().filter(|v| rank_key(**v).is_none()).count(),
            "ranked criterion"
        );
        for (total, rank) in totals.iter_mut().zip(ranks) {
            *total += rank as f64 * criterion.weight;
        }
    }
    totals
}

/// Map rank totals onto 0–100: the lowest total becomes 100 and the highest 0.
/// When every total is (nearly) equal, everyone gets 100.
pub fn normalise_scores(raw: &[f64]) -> Vec<f64> {
    let (min, max) = raw
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if raw.is_empty() || is_close(max, min) {
        return vec![100.0; raw.len()];
    }
    raw.iter().map(|&v| (max - v) / (max - min) * 100.0).collect()
}

/// Rank and score every campaign. Output stays in input order.
pub fn score_campaigns(
    records: Vec<CampaignRecord>,
    metrics: Vec<DerivedMetrics>,
    config: &ScoringConfig,
) -> Vec<ScoredCampaign> {
    let raw = weighted_rank_totals(&records, &metrics, config);
    let scores = normalise_scores(&raw);
    records
        .into_iter()
        .zip(metrics)
        .zip(raw.into_iter().zip(scores))
        .map(|((record, metrics), (raw_score, score))| ScoredCampaign {
            record,
            metrics,
            raw_score,
            score,
        })
        .collect()
}

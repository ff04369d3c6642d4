// Per-campaign efficiency metrics.
//
// Each ratio has its own zero-denominator policy:
//
// | Metric        | Ratio           | Zero / missing denominator        |
// |---------------|-----------------|-----------------------------------|
// | CPL           | Spend / Leads   | Spend                             |
// | CPA           | Spend / Sales   | Spend                             |
// | ROAS          | Revenue / Spend | 99.0 if Revenue > 0, else 0.0     |
// | ROI           | P/L / Spend     | 99.0 if Revenue > 0, else 0.0     |
// | C-rate        | Sales / Leads   | null                              |
// | Rev. per lead | Revenue / Leads | null                              |
//
// Everything is rounded to two decimals here, so ranking later works on the
// rounded figures.
use crate::types::{CampaignRecord, DerivedMetrics};
use crate::util::round2;

/// Returned by ROAS and ROI when nothing was spent but revenue came in.
pub const UNBOUNDED_RETURN: f64 = 99.0;

/// A denominator that can actually be divided by.
fn usable(denominator: Option<f64>) -> Option<f64> {
    denominator.filter(|d| *d != 0.0)
}

fn cost_per(spend: Option<f64>, count: Option<f64>) -> Option<f64> {
    match usable(count) {
        Some(count) => spend.map(|s| round2(s / count)),
        None => spend,
    }
}

fn return_on_spend(numerator: Option<f64>, spend: Option<f64>, revenue: Option<f64>) -> Option<f64> {
    match usable(spend) {
        Some(spend) => numerator.map(|n| round2(n / spend)),
        None if revenue.is_some_and(|r| r > 0.0) => Some(UNBOUNDED_RETURN),
        None => Some(0.0),
    }
}

fn per_lead(numerator: Option<f64>, leads: Option<f64>) -> Option<f64> {
    let leads = usable(leads)?;
    numerator.map(|n| round2(n / leads))
}

/// Derive the seven metrics for a single campaign.
pub fn derive(record: &CampaignRecord) -> DerivedMetrics {
    let spend = record.total_spend;
    let revenue = record.revenue;

    let profit_loss = match (revenue, spend) {
        (Some(r), Some(s)) => Some(round2(r - s)),
        _ => None,
    };

    DerivedMetrics {
        profit_loss,
        cpl: cost_per(spend, record.total_leads),
        cpa: cost_per(spend, record.total_sales),
        roas: return_on_spend(revenue, spend, revenue),
        roi: return_on_spend(profit_loss, spend, revenue),
        conversion_rate: per_lead(record.total_sales, record.total_leads),
        revenue_per_lead: per_lead(revenue, record.total_leads),
    }
}

/// Derive metrics for every record, independently and in input order.
pub fn derive_all(records: &[CampaignRecord]) -> Vec<DerivedMetrics> {
    records.iter().map(derive).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use csv::StringRecord;
    use proptest::prelude::*;

    fn record(spend: f64, leads: f64, sales: f64, revenue: f64) -> CampaignRecord {
        CampaignRecord {
            name: "test".to_string(),
            total_spend: Some(spend),
            total_leads: Some(leads),
            total_sales: Some(sales),
            revenue: Some(revenue),
            source: StringRecord::new(),
        }
    }

    #[test]
    fn profitable_campaign() {
        let m = derive(&record(1000.0, 10.0, 2.0, 2000.0));
        assert_eq!(m.profit_loss, Some(1000.0));
        assert_eq!(m.cpl, Some(100.0));
        assert_eq!(m.cpa, Some(500.0));
        assert_eq!(m.roas, Some(2.0));
        assert_eq!(m.roi, Some(1.0));
        assert_eq!(m.conversion_rate, Some(0.2));
        assert_eq!(m.revenue_per_lead, Some(200.0));
    }

    #[test]
    fn zero_leads_and_sales_fall_back_to_spend() {
        let m = derive(&record(500.0, 0.0, 0.0, 0.0));
        assert_eq!(m.profit_loss, Some(-500.0));
        assert_eq!(m.cpl, Some(500.0));
        assert_eq!(m.cpa, Some(500.0));
        assert_eq!(m.roas, Some(0.0));
        assert_eq!(m.roi, Some(-1.0));
        assert_eq!(m.conversion_rate, None);
        assert_eq!(m.revenue_per_lead, None);
    }

    #[test]
    fn zero_spend_uses_sentinel_only_with_revenue() {
        let earned = derive(&record(0.0, 5.0, 1.0, 300.0));
        assert_eq!(earned.roas, Some(UNBOUNDED_RETURN));
        assert_eq!(earned.roi, Some(UNBOUNDED_RETURN));
        assert_eq!(earned.cpl, Some(0.0));

        let idle = derive(&record(0.0, 0.0, 0.0, 0.0));
        assert_eq!(idle.roas, Some(0.0));
        assert_eq!(idle.roi, Some(0.0));
    }

    #[test]
    fn missing_cells_follow_the_same_policies() {
        let mut rec = record(400.0, 0.0, 0.0, 100.0);
        rec.total_leads = None;
        rec.total_sales = None;
        let m = derive(&rec);
        assert_eq!(m.cpl, Some(400.0));
        assert_eq!(m.cpa, Some(400.0));
        assert_eq!(m.conversion_rate, None);

        rec.total_spend = None;
        let m = derive(&rec);
        assert_eq!(m.profit_loss, None);
        assert_eq!(m.roas, Some(UNBOUNDED_RETURN));
        assert_eq!(m.cpl, None);
    }

    #[test]
    fn negative_inputs_flow_through() {
        let m = derive(&record(-100.0, 4.0, 1.0, 50.0));
        assert_eq!(m.profit_loss, Some(150.0));
        assert_eq!(m.cpl, Some(-25.0));
        assert_eq!(m.roas, Some(-0.5));
    }

    #[test]
    fn ratios_are_rounded() {
        let m = derive(&record(100.0, 3.0, 3.0, 200.0));
        assert_eq!(m.cpl, Some(33.33));
        assert_eq!(m.revenue_per_lead, Some(66.67));
        assert_eq!(m.conversion_rate, Some(1.0));
    }

    proptest! {
        #[test]
        fn profit_loss_is_rounded_difference(spend in 0.0f64..1e7, revenue in 0.0f64..1e7) {
            let m = derive(&record(spend, 1.0, 1.0, revenue));
            prop_assert_eq!(m.profit_loss, Some(round2(revenue - spend)));
        }

        #[test]
        fn cpl_divides_or_falls_back(spend in 0.0f64..1e6, leads in 0u32..500) {
            let m = derive(&record(spend, f64::from(leads), 0.0, 0.0));
            if leads > 0 {
                prop_assert_eq!(m.cpl, Some(round2(spend / f64::from(leads))));
            } else {
                prop_assert_eq!(m.cpl, Some(spend));
            }
        }

        #[test]
        fn zero_spend_returns_are_sentinel_or_zero(revenue in 0.0f64..1e6) {
            let m = derive(&record(0.0, 1.0, 1.0, revenue));
            let expected = if revenue > 0.0 { UNBOUNDED_RETURN } else { 0.0 };
            prop_assert_eq!(m.roas, Some(expected));
            prop_assert_eq!(m.roi, Some(expected));
        }
    }
}

//! Marketing and business totals joined by date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::derived::safe_div;
use crate::models::{BlendedDailyKpi, BusinessRecord, BusinessTotals, DailyMarketingAggregate};

/// Inner-join daily marketing aggregates with business totals on `date`.
///
/// Dates present in only one input are left out. Output is ordered by date.
pub fn blend(
    daily_marketing: &[DailyMarketingAggregate],
    daily_business: &[BusinessRecord],
) -> Vec<BlendedDailyKpi> {
    if daily_marketing.is_empty() || daily_business.is_empty() {
        return Vec::new();
    }

    let mut business_by_date: BTreeMap<NaiveDate, Vec<&BusinessRecord>> = BTreeMap::new();
    for record in daily_business {
        business_by_date.entry(record.date).or_default().push(record);
    }

    let mut rows = Vec::new();
    for marketing in daily_marketing {
        let Some(matches) = business_by_date.get(&marketing.date) else {
            continue;
        };
        for business in matches {
            rows.push(blended_row(
                marketing.date,
                marketing.spend,
                marketing.attributed_revenue,
                Some(&business.totals()),
            ));
        }
    }
    rows.sort_by_key(|row| row.date);
    rows
}

/// Build one blended row from its primitives.
///
/// `None` business totals (a lagged row with nothing to lag from) zero-fill every business
/// primitive and every KPI that depends on one.
pub fn blended_row(
    date: NaiveDate,
    spend: f64,
    attributed_revenue: f64,
    totals: Option<&BusinessTotals>,
) -> BlendedDailyKpi {
    let business = totals.copied().unwrap_or_default();
    let contribution_after_ads = match totals {
        Some(t) => t.gross_profit - spend,
        None => 0.0,
    };

    BlendedDailyKpi {
        date,
        spend,
        attributed_revenue,
        orders: business.orders,
        new_customers: business.new_customers,
        total_revenue: business.total_revenue,
        gross_profit: business.gross_profit,
        mer: safe_div(business.total_revenue, spend),
        blended_cac: safe_div(spend, business.new_customers),
        aov: safe_div(business.total_revenue, business.orders),
        gross_margin_pct: safe_div(business.gross_profit, business.total_revenue),
        contribution_after_ads,
        profit_roas: safe_div(business.gross_profit, spend),
    }
}

/// Shift business primitives forward by `days` rows and rebuild every KPI from them.
///
/// Spend stays on its own day. The first `days` rows have no lagged source and get
/// zero-filled business metrics.
pub fn lag_business_metrics(rows: &[BlendedDailyKpi], days: usize) -> Vec<BlendedDailyKpi> {
    let mut sorted = rows.to_vec();
    sorted.sort_by_key(|row| row.date);
    if days == 0 {
        return sorted;
    }

    sorted
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let lagged = i.checked_sub(days).map(|j| sorted[j].business_totals());
            blended_row(row.date, row.spend, row.attributed_revenue, lagged.as_ref())
        })
        .collect()
}

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{AdVolume, DailyMarketingAggregate, Record};

/// Collapse marketing rows to one row per date, summing the volume columns.
pub fn aggregate_daily<R: Record + AdVolume>(rows: &[R]) -> Vec<DailyMarketingAggregate> {
    let mut by_date: BTreeMap<NaiveDate, DailyMarketingAggregate> = BTreeMap::new();
    for row in rows {
        let entry = by_date
            .entry(row.date())
            .or_insert_with(|| DailyMarketingAggregate::empty(row.date()));
        entry.impressions += row.impressions();
        entry.clicks += row.clicks();
        entry.spend += row.spend();
        entry.attributed_revenue += row.attributed_revenue();
    }
    by_date.into_values().collect()
}

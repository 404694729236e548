//! Daily business-totals feed.

use tracing::debug;

use super::csv_source::RawTable;
use super::parse::{parse_date, NumericCells};
use super::IngestStats;
use crate::models::BusinessRecord;

const DATE: &[&str] = &["date"];
const ORDERS: &[&str] = &["# of orders", "orders"];
const NEW_ORDERS: &[&str] = &["# of new orders", "new_orders"];
const NEW_CUSTOMERS: &[&str] = &["new customers", "new_customers"];
const TOTAL_REVENUE: &[&str] = &["total revenue", "total_revenue"];
const GROSS_PROFIT: &[&str] = &["gross profit", "gross_profit"];
const COGS: &[&str] = &["cogs"];

/// Normalise the business feed; same date-drop and zero-default rules as channel exports.
pub fn ingest_business(raw: &RawTable) -> Vec<BusinessRecord> {
    ingest_business_with_stats(raw).0
}

pub fn ingest_business_with_stats(raw: &RawTable) -> (Vec<BusinessRecord>, IngestStats) {
    let date_col = raw.column_any(DATE);
    let orders_col = raw.column_any(ORDERS);
    let new_orders_col = raw.column_any(NEW_ORDERS);
    let new_customers_col = raw.column_any(NEW_CUSTOMERS);
    let total_revenue_col = raw.column_any(TOTAL_REVENUE);
    let gross_profit_col = raw.column_any(GROSS_PROFIT);
    let cogs_col = raw.column_any(COGS);

    let mut stats = IngestStats::default();
    let mut numbers = NumericCells::default();
    let mut records = Vec::with_capacity(raw.len());

    for row in raw.rows() {
        stats.rows_read += 1;
        let Some(date) = parse_date(row.get(date_col)) else {
            stats.rows_dropped += 1;
            continue;
        };

        records.push(BusinessRecord {
            date,
            orders: numbers.read(row.get(orders_col)),
            new_orders: numbers.read(row.get(new_orders_col)),
            new_customers: numbers.read(row.get(new_customers_col)),
            total_revenue: numbers.read(row.get(total_revenue_col)),
            gross_profit: numbers.read(row.get(gross_profit_col)),
            cogs: numbers.read(row.get(cogs_col)),
        });
    }

    stats.rows_kept = records.len();
    stats.numeric_defaults = numbers.defaulted;
    debug!(
        rows_read = stats.rows_read,
        rows_dropped = stats.rows_dropped,
        "ingested business feed"
    );
    (records, stats)
}

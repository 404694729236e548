//! Unit tests for business feed ingestion

use marketing_intel::ingest::{ingest_business, ingest_business_with_stats, read_raw_table};
use marketing_intel::models::BusinessRecord;

use crate::fixtures::day;

#[test]
fn business_columns_are_renamed() {
    let raw = read_raw_table(
        "date,# of orders,# of new orders,new customers,total revenue,gross profit,COGS\n\
         2024-01-01,10,8,5,500,200,300\n"
            .as_bytes(),
    )
    .unwrap();
    let records = ingest_business(&raw);

    assert_eq!(records.len(), 1);
    let row = records[0];
    assert_eq!(row.date, day(1));
    assert_eq!(row.orders, 10.0);
    assert_eq!(row.new_orders, 8.0);
    assert_eq!(row.new_customers, 5.0);
    assert_eq!(row.total_revenue, 500.0);
    assert_eq!(row.gross_profit, 200.0);
    assert_eq!(row.cogs, 300.0);
}

#[test]
fn headers_match_regardless_of_case_and_padding() {
    let raw = read_raw_table(
        " Date , # OF ORDERS ,Total Revenue\n2024-01-02,3,90\n".as_bytes(),
    )
    .unwrap();
    let records = ingest_business(&raw);

    assert_eq!(records[0].orders, 3.0);
    assert_eq!(records[0].total_revenue, 90.0);
}

#[test]
fn rows_without_dates_are_dropped() {
    let raw = read_raw_table(
        "date,# of orders\nyesterday,1\n2024-01-03,2\n".as_bytes(),
    )
    .unwrap();
    let (records, stats) = ingest_business_with_stats(&raw);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].date, day(3));
    assert_eq!(stats.rows_dropped, 1);
}

#[test]
fn serialised_record_has_canonical_columns() {
    let raw = read_raw_table("date,cogs\n2024-01-01,4\n".as_bytes()).unwrap();
    let records = ingest_business(&raw);

    let value = serde_json::to_value(records[0]).unwrap();
    let mut keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    let mut expected = BusinessRecord::COLUMNS.to_vec();
    expected.sort_unstable();
    assert_eq!(keys, expected);
}

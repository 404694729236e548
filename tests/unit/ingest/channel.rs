//! Unit tests for channel export ingestion

use marketing_intel::ingest::{ingest_channel, ingest_channel_with_stats, read_raw_table};
use marketing_intel::models::{Channel, MarketingRecord};
use marketing_intel::with_derived_metrics;

use crate::fixtures::day;

const HEADER: &str = "date,tactic,state,campaign,impression,clicks,spend,attributed revenue\n";

#[test]
fn canonical_row_gets_expected_derived_metrics() {
    let csv = format!("{HEADER}2024-01-01,SearchX,CA,CampA,1000,50,100.0,300.0\n");
    let raw = read_raw_table(csv.as_bytes()).unwrap();
    let records = ingest_channel(&raw, &Channel::Facebook);

    assert_eq!(records.len(), 1);
    let row = &records[0];
    assert_eq!(row.date, day(1));
    assert_eq!(row.channel, Channel::Facebook);
    assert_eq!(row.tactic, "SearchX");
    assert_eq!(row.impressions, 1000.0);

    let derived = with_derived_metrics(&records);
    let metrics = derived[0].metrics;
    assert_eq!(metrics.ctr, 0.05);
    assert_eq!(metrics.cpc, 2.0);
    assert_eq!(metrics.cpm, 100.0);
    assert_eq!(metrics.roas, 3.0);
}

#[test]
fn empty_file_yields_empty_table() {
    let raw = read_raw_table("".as_bytes()).unwrap();
    let (records, stats) = ingest_channel_with_stats(&raw, &Channel::Google);
    assert!(records.is_empty());
    assert_eq!(stats.rows_read, 0);
}

#[test]
fn header_only_file_yields_empty_table() {
    let raw = read_raw_table(HEADER.as_bytes()).unwrap();
    assert!(ingest_channel(&raw, &Channel::Google).is_empty());
}

#[test]
fn unparseable_dates_are_dropped_and_counted() {
    let csv = format!(
        "{HEADER}not-a-date,Search,CA,C1,10,1,2,3\n\
         ,Search,CA,C1,10,1,2,3\n\
         2024/01/02,Search,CA,C1,10,1,2,3\n"
    );
    let raw = read_raw_table(csv.as_bytes()).unwrap();
    let (records, stats) = ingest_channel_with_stats(&raw, &Channel::Google);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].date, day(2));
    assert_eq!(stats.rows_read, 3);
    assert_eq!(stats.rows_dropped, 2);
    assert_eq!(stats.rows_kept, 1);
}

#[test]
fn bad_numbers_default_to_zero_and_text_is_trimmed() {
    let csv = format!("{HEADER}2024-01-03,  Video ,  NY , Spring ,n/a,,12.5,NaN\n");
    let raw = read_raw_table(csv.as_bytes()).unwrap();
    let (records, stats) = ingest_channel_with_stats(&raw, &Channel::TikTok);

    let row = &records[0];
    assert_eq!(row.tactic, "Video");
    assert_eq!(row.state, "NY");
    assert_eq!(row.campaign, "Spring");
    assert_eq!(row.impressions, 0.0);
    assert_eq!(row.clicks, 0.0);
    assert_eq!(row.spend, 12.5);
    assert_eq!(row.attributed_revenue, 0.0);
    assert_eq!(stats.numeric_defaults, 3);
}

#[test]
fn missing_columns_read_as_defaults() {
    let raw = read_raw_table("date,spend\n2024-01-04,7\n".as_bytes()).unwrap();
    let records = ingest_channel(&raw, &Channel::Google);

    assert_eq!(records[0].spend, 7.0);
    assert_eq!(records[0].tactic, "");
    assert_eq!(records[0].clicks, 0.0);
}

#[test]
fn serialised_record_has_canonical_columns() {
    let csv = format!("{HEADER}2024-01-01,SearchX,CA,CampA,1000,50,100.0,300.0\n");
    let raw = read_raw_table(csv.as_bytes()).unwrap();
    let records = ingest_channel(&raw, &Channel::Google);

    let value = serde_json::to_value(&records[0]).unwrap();
    let object = value.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    let mut expected = MarketingRecord::COLUMNS.to_vec();
    expected.sort_unstable();
    assert_eq!(keys, expected);
    assert_eq!(object["channel"], "Google");
}

#[test]
fn extra_columns_serialise_as_trailing_keys() {
    let raw = read_raw_table(
        "date,tactic,state,campaign,impression,clicks,spend,attributed revenue,notes,ad_group\n\
         2024-01-01,Search,CA,C1,10,1,2,3,hello,AG1\n"
            .as_bytes(),
    )
    .unwrap();
    let records = ingest_channel(&raw, &Channel::Google);

    let json = serde_json::to_string(&records[0]).unwrap();
    let position = |key: &str| json.find(&format!("\"{key}\"")).unwrap();
    assert!(position("attributed_revenue") < position("notes"));
    assert!(position("notes") < position("ad_group"));
    assert!(!json.contains("extras"));

    let back: MarketingRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, records[0]);
}

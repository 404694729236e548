//! Unit tests for the snapshot loader over an in-memory source

use std::path::PathBuf;
use std::sync::Arc;

use marketing_intel::config::DataConfig;
use marketing_intel::ingest::read_raw_table;
use marketing_intel::metrics::Metrics;
use marketing_intel::models::Channel;
use marketing_intel::services::InMemorySource;
use marketing_intel::DataLoader;

const CHANNEL_CSV: &str = "date,tactic,state,campaign,impression,clicks,spend,attributed revenue\n\
                           2024-01-02,Search,CA,A,100,10,20,60\n\
                           2024-01-01,Search,CA,B,100,10,30,90\n";
const BUSINESS_CSV: &str = "date,# of orders,# of new orders,new customers,total revenue,gross profit,COGS\n\
                            2024-01-01,10,8,5,500,200,300\n";

fn setup() -> (Arc<InMemorySource>, DataLoader, Arc<Metrics>) {
    let source = Arc::new(InMemorySource::new());
    let config = DataConfig::new("mem", &[Channel::Google, Channel::TikTok]);
    source.insert(
        PathBuf::from("mem/Google.csv"),
        read_raw_table(CHANNEL_CSV.as_bytes()).unwrap(),
    );
    source.insert(
        PathBuf::from("mem/business.csv"),
        read_raw_table(BUSINESS_CSV.as_bytes()).unwrap(),
    );
    let metrics = Arc::new(Metrics::new().unwrap());
    let loader = DataLoader::new(config, source.clone(), Some(metrics.clone()));
    (source, loader, metrics)
}

#[test]
fn missing_channel_is_an_empty_source() {
    let (_source, loader, _metrics) = setup();
    let data = loader.load_all();

    assert_eq!(data.unified().len(), 2);
    assert_eq!(data.business().len(), 1);
    let tiktok = &data.marketing.sources[1];
    assert_eq!(tiktok.source, "TikTok");
    assert!(!tiktok.found);
    assert_eq!(tiktok.stats.rows_kept, 0);
}

#[test]
fn unified_rows_are_date_sorted_and_aggregated() {
    let (_source, loader, _metrics) = setup();
    let data = loader.load_all();
    let (unified, business, daily) = data.tables();

    assert!(unified[0].date < unified[1].date);
    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0].spend, 30.0);
    assert_eq!(business[0].total_revenue, 500.0);
}

#[test]
fn unchanged_sources_are_served_from_cache() {
    let (_source, loader, metrics) = setup();
    let first = loader.load_all();
    let second = loader.load_all();

    assert!(Arc::ptr_eq(&first.marketing, &second.marketing));
    assert!(Arc::ptr_eq(&first.business, &second.business));
    assert_eq!(metrics.snapshot_cache_misses_total.get(), 2);
    assert_eq!(metrics.snapshot_cache_hits_total.get(), 2);
}

#[test]
fn changed_source_is_reloaded() {
    let (source, loader, _metrics) = setup();
    let before = loader.load_marketing();

    source.insert(
        PathBuf::from("mem/TikTok.csv"),
        read_raw_table(CHANNEL_CSV.as_bytes()).unwrap(),
    );
    let after = loader.load_marketing();

    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before.unified.len(), 2);
    assert_eq!(after.unified.len(), 4);
}

#[test]
fn ingest_counters_are_labelled_by_source() {
    let (_source, loader, metrics) = setup();
    loader.load_all();

    let google = metrics
        .source_rows_ingested_total
        .with_label_values(&["Google"])
        .get();
    let business = metrics
        .source_rows_ingested_total
        .with_label_values(&["business"])
        .get();
    assert_eq!(google, 2);
    assert_eq!(business, 1);
}

#[test]
fn removed_source_loads_as_empty() {
    let (source, loader, _metrics) = setup();
    assert_eq!(loader.load_business().records.len(), 1);

    source.remove(std::path::Path::new("mem/business.csv"));
    let business = loader.load_business();
    assert!(business.records.is_empty());
    assert!(!business.source.found);
}

#[test]
fn reloads_keep_one_snapshot_per_source() {
    let (source, loader, _metrics) = setup();
    for _ in 0..5 {
        source.insert(
            PathBuf::from("mem/Google.csv"),
            read_raw_table(CHANNEL_CSV.as_bytes()).unwrap(),
        );
        source.insert(
            PathBuf::from("mem/business.csv"),
            read_raw_table(BUSINESS_CSV.as_bytes()).unwrap(),
        );
        let data = loader.load_all();
        assert_eq!(data.unified().len(), 2);
        assert_eq!(loader.cached_snapshots(), 2);
    }
}

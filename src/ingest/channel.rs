//! Per-channel advertising exports.

use tracing::debug;

use super::csv_source::RawTable;
use super::parse::{clean_text, parse_date, NumericCells};
use super::IngestStats;
use crate::models::{Channel, MarketingRecord};

// Canonical column, then the names it may appear under in an export.
const DATE: &[&str] = &["date"];
const TACTIC: &[&str] = &["tactic"];
const STATE: &[&str] = &["state"];
const CAMPAIGN: &[&str] = &["campaign"];
const IMPRESSIONS: &[&str] = &["impression", "impressions"];
const CLICKS: &[&str] = &["clicks"];
const SPEND: &[&str] = &["spend"];
const ATTRIBUTED_REVENUE: &[&str] = &["attributed revenue", "attributed_revenue"];

/// Names that map onto canonical columns and therefore never count as extras.
const CANONICAL_SOURCE_NAMES: &[&str] = &[
    "date",
    "channel",
    "tactic",
    "state",
    "campaign",
    "impression",
    "impressions",
    "clicks",
    "spend",
    "attributed revenue",
    "attributed_revenue",
];

/// Normalise one channel export into marketing records tagged with `channel`.
///
/// Rows whose date does not parse are dropped; unparseable numbers become zero.
pub fn ingest_channel(raw: &RawTable, channel: &Channel) -> Vec<MarketingRecord> {
    ingest_channel_with_stats(raw, channel).0
}

pub fn ingest_channel_with_stats(
    raw: &RawTable,
    channel: &Channel,
) -> (Vec<MarketingRecord>, IngestStats) {
    let date_col = raw.column_any(DATE);
    let tactic_col = raw.column_any(TACTIC);
    let state_col = raw.column_any(STATE);
    let campaign_col = raw.column_any(CAMPAIGN);
    let impressions_col = raw.column_any(IMPRESSIONS);
    let clicks_col = raw.column_any(CLICKS);
    let spend_col = raw.column_any(SPEND);
    let revenue_col = raw.column_any(ATTRIBUTED_REVENUE);

    let extra_cols: Vec<(usize, String)> = raw
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, h)| {
            let name = h.trim().to_lowercase();
            !CANONICAL_SOURCE_NAMES.contains(&name.as_str())
        })
        .map(|(i, h)| (i, h.trim().to_string()))
        .collect();

    let mut stats = IngestStats::default();
    let mut numbers = NumericCells::default();
    let mut records = Vec::with_capacity(raw.len());

    for row in raw.rows() {
        stats.rows_read += 1;
        let Some(date) = parse_date(row.get(date_col)) else {
            stats.rows_dropped += 1;
            continue;
        };

        records.push(MarketingRecord {
            date,
            channel: channel.clone(),
            tactic: clean_text(row.get(tactic_col)),
            state: clean_text(row.get(state_col)),
            campaign: clean_text(row.get(campaign_col)),
            impressions: numbers.read(row.get(impressions_col)),
            clicks: numbers.read(row.get(clicks_col)),
            spend: numbers.read(row.get(spend_col)),
            attributed_revenue: numbers.read(row.get(revenue_col)),
            extras: extra_cols
                .iter()
                .map(|(i, name)| (name.clone(), row.get(Some(*i)).to_string()))
                .collect(),
        });
    }

    stats.rows_kept = records.len();
    stats.numeric_defaults = numbers.defaulted;
    debug!(
        channel = %channel,
        rows_read = stats.rows_read,
        rows_dropped = stats.rows_dropped,
        "ingested channel export"
    );
    (records, stats)
}

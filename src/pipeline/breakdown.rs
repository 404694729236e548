//! Volume totals grouped by categorical dimensions.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::derived::derive_metrics;
use super::frame::{Frame, FrameRow};
use crate::models::{AdVolume, DerivedMetrics, Dimension, Record};

/// Summed volume for one combination of labels, with its ratio metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    #[serde(flatten)]
    pub labels: BTreeMap<String, String>,
    pub impressions: f64,
    pub clicks: f64,
    pub spend: f64,
    pub attributed_revenue: f64,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

impl Breakdown {
    pub fn label(&self, dimension: Dimension) -> Option<&str> {
        self.labels.get(dimension.as_str()).map(String::as_str)
    }
}

impl AdVolume for Breakdown {
    fn impressions(&self) -> f64 {
        self.impressions
    }
    fn clicks(&self) -> f64 {
        self.clicks
    }
    fn spend(&self) -> f64 {
        self.spend
    }
    fn attributed_revenue(&self) -> f64 {
        self.attributed_revenue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    Spend,
    Roas,
}

/// Group rows by the given dimensions and sum their volume. Output is ordered by label tuple.
pub fn breakdown<R: Record + AdVolume>(rows: &[R], dimensions: &[Dimension]) -> Vec<Breakdown> {
    let mut groups: BTreeMap<Vec<String>, [f64; 4]> = BTreeMap::new();
    for row in rows {
        let key: Vec<String> = dimensions
            .iter()
            .map(|d| row.label(*d).unwrap_or_default().to_string())
            .collect();
        let sums = groups.entry(key).or_insert([0.0; 4]);
        sums[0] += row.impressions();
        sums[1] += row.clicks();
        sums[2] += row.spend();
        sums[3] += row.attributed_revenue();
    }

    groups
        .into_iter()
        .map(|(key, [impressions, clicks, spend, attributed_revenue])| {
            let mut out = Breakdown {
                labels: dimensions
                    .iter()
                    .map(|d| d.as_str().to_string())
                    .zip(key)
                    .collect(),
                impressions,
                clicks,
                spend,
                attributed_revenue,
                metrics: DerivedMetrics::default(),
            };
            out.metrics = derive_metrics(&out);
            out
        })
        .collect()
}

fn by_spend_desc(a: &Breakdown, b: &Breakdown) -> Ordering {
    b.spend.total_cmp(&a.spend)
}

/// Per-channel totals, largest spend first.
pub fn channel_breakdown<R: Record + AdVolume>(rows: &[R]) -> Vec<Breakdown> {
    let mut out = breakdown(rows, &[Dimension::Channel]);
    out.sort_by(by_spend_desc);
    out
}

/// Per-campaign totals ordered by channel, then largest spend first within a channel.
pub fn campaign_breakdown<R: Record + AdVolume>(rows: &[R]) -> Vec<Breakdown> {
    let mut out = breakdown(rows, &Dimension::ALL);
    out.sort_by(|a, b| {
        a.label(Dimension::Channel)
            .cmp(&b.label(Dimension::Channel))
            .then_with(|| by_spend_desc(a, b))
    });
    out
}

pub fn state_breakdown<R: Record + AdVolume>(rows: &[R]) -> Vec<Breakdown> {
    breakdown(rows, &[Dimension::State])
}

/// Per channel and tactic totals, largest spend first.
pub fn tactic_breakdown<R: Record + AdVolume>(rows: &[R]) -> Vec<Breakdown> {
    let mut out = breakdown(rows, &[Dimension::Channel, Dimension::Tactic]);
    out.sort_by(by_spend_desc);
    out
}

/// The `n` largest rows by spend or ROAS; ties keep their input order.
pub fn top_by(rows: &[Breakdown], rank: RankBy, n: usize) -> Vec<Breakdown> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| match rank {
        RankBy::Spend => b.spend.total_cmp(&a.spend),
        RankBy::Roas => b.metrics.roas.total_cmp(&a.metrics.roas),
    });
    ranked.truncate(n);
    ranked
}

/// Daily spend and attributed revenue per channel with ROAS, ordered by channel then date.
pub fn channel_daily_series<R: Record + AdVolume>(rows: &[R]) -> Frame {
    let mut sums: BTreeMap<(String, NaiveDate), (f64, f64)> = BTreeMap::new();
    for row in rows {
        let channel = row.label(Dimension::Channel).unwrap_or_default().to_string();
        let entry = sums.entry((channel, row.date())).or_insert((0.0, 0.0));
        entry.0 += row.spend();
        entry.1 += row.attributed_revenue();
    }

    let mut frame = Frame::new(["channel"], ["spend", "attributed_revenue"]);
    for ((channel, date), (spend, revenue)) in sums {
        frame.push(
            FrameRow::new(date)
                .with_label("channel", channel)
                .with_value("spend", Some(spend))
                .with_value("attributed_revenue", Some(revenue)),
        );
    }
    frame.with_derived_metrics()
}

//! Unit tests for dimension breakdowns

use marketing_intel::models::{Channel, Dimension};
use marketing_intel::pipeline::{
    campaign_breakdown, channel_breakdown, channel_daily_series, state_breakdown,
    tactic_breakdown, top_by, RankBy,
};

use crate::fixtures::{day, marketing};

fn rows() -> Vec<marketing_intel::models::MarketingRecord> {
    vec![
        marketing(1, Channel::Google, "Search", "CA", "G1", [1000.0, 50.0, 100.0, 300.0]),
        marketing(2, Channel::Google, "Search", "NY", "G2", [500.0, 10.0, 300.0, 300.0]),
        marketing(1, Channel::Facebook, "Social", "CA", "F1", [2000.0, 20.0, 50.0, 500.0]),
        marketing(2, Channel::TikTok, "Video", "TX", "T1", [100.0, 0.0, 0.0, 0.0]),
    ]
}

#[test]
fn channel_breakdown_sums_and_orders_by_spend() {
    let out = channel_breakdown(&rows());
    let channels: Vec<&str> = out
        .iter()
        .map(|b| b.label(Dimension::Channel).unwrap())
        .collect();
    assert_eq!(channels, vec!["Google", "Facebook", "TikTok"]);

    let google = &out[0];
    assert_eq!(google.spend, 400.0);
    assert_eq!(google.attributed_revenue, 600.0);
    assert_eq!(google.metrics.roas, 1.5);
    assert_eq!(google.metrics.cpc, 400.0 / 60.0);

    let tiktok = &out[2];
    assert_eq!(tiktok.metrics.roas, 0.0);
    assert_eq!(tiktok.metrics.cpc, 0.0);
}

#[test]
fn campaign_breakdown_orders_by_channel_then_spend() {
    let out = campaign_breakdown(&rows());
    let campaigns: Vec<&str> = out
        .iter()
        .map(|b| b.label(Dimension::Campaign).unwrap())
        .collect();
    assert_eq!(campaigns, vec!["F1", "G2", "G1", "T1"]);
    assert_eq!(out[0].label(Dimension::Tactic), Some("Social"));
}

#[test]
fn top_states_by_spend_and_roas() {
    let states = state_breakdown(&rows());
    assert_eq!(states.len(), 3);

    let by_spend = top_by(&states, RankBy::Spend, 2);
    let names: Vec<&str> = by_spend
        .iter()
        .map(|b| b.label(Dimension::State).unwrap())
        .collect();
    assert_eq!(names, vec!["NY", "CA"]);

    let by_roas = top_by(&states, RankBy::Roas, 1);
    assert_eq!(by_roas[0].label(Dimension::State), Some("CA"));
    assert!((by_roas[0].metrics.roas - 800.0 / 150.0).abs() < 1e-12);
}

#[test]
fn tactic_breakdown_keys_on_channel_and_tactic_by_spend() {
    let out = tactic_breakdown(&rows());
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|b| b.labels.len() == 2));

    let tactics: Vec<&str> = out
        .iter()
        .map(|b| b.label(Dimension::Tactic).unwrap())
        .collect();
    assert_eq!(tactics, vec!["Search", "Social", "Video"]);
    assert_eq!(out[0].spend, 400.0);
}

#[test]
fn breakdown_serialises_flat() {
    let out = channel_breakdown(&rows());
    let value = serde_json::to_value(&out[0]).unwrap();
    assert_eq!(value["channel"], "Google");
    assert_eq!(value["spend"], 400.0);
    assert_eq!(value["roas"], 1.5);
}

#[test]
fn channel_series_has_roas_per_channel_day() {
    let frame = channel_daily_series(&rows());
    assert_eq!(frame.len(), 4);
    let first = &frame.rows()[0];
    assert_eq!(first.label("channel"), Some("Facebook"));
    assert_eq!(first.date, day(1));
    assert_eq!(first.value("roas"), Some(10.0));
    assert!(frame.has_column("roas"));
}

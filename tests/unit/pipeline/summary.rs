//! Unit tests for the executive summary and period comparison

use chrono::NaiveDate;
use marketing_intel::models::{Channel, DateRange, FilterSpec, Targets};
use marketing_intel::pipeline::{compare_previous_period, executive_summary};

use crate::fixtures::{business, day, marketing, spend_row};

#[test]
fn summary_counts_business_only_on_joined_days() {
    let marketing_rows = vec![spend_row(1, 100.0, 300.0), spend_row(2, 100.0, 100.0)];
    let business_rows = vec![
        business(1, 10.0, 5.0, 500.0, 200.0),
        business(3, 10.0, 5.0, 900.0, 300.0),
    ];
    let summary = executive_summary(&marketing_rows, &business_rows, &Targets::default());

    assert_eq!(summary.total_spend, 200.0);
    assert_eq!(summary.total_attributed_revenue, 400.0);
    assert_eq!(summary.total_revenue, 500.0);
    assert_eq!(summary.total_new_customers, 5.0);
    assert_eq!(summary.joined_days, 1);
    assert_eq!(summary.mer, 2.5);
    assert_eq!(summary.blended_cac, 40.0);
    assert_eq!(summary.attributed_roas, 2.0);
    assert_eq!(summary.contribution_after_ads, 100.0);
    assert_eq!(summary.deltas.mer, None);
}

#[test]
fn target_deltas_invert_cac() {
    let summary = executive_summary(
        &[spend_row(1, 100.0, 300.0)],
        &[business(1, 10.0, 5.0, 500.0, 200.0)],
        &Targets {
            mer: Some(4.0),
            cac: Some(25.0),
            roas: Some(2.5),
            profit_roas: Some(2.5),
        },
    );

    assert_eq!(summary.deltas.mer, Some(1.0));
    assert_eq!(summary.deltas.cac, Some(5.0));
    assert_eq!(summary.deltas.roas, Some(0.5));
    assert_eq!(summary.deltas.profit_roas, Some(-0.5));
}

#[test]
fn empty_inputs_give_zero_summary() {
    let summary = executive_summary::<marketing_intel::models::MarketingRecord>(
        &[],
        &[],
        &Targets::default(),
    );
    assert_eq!(summary.total_spend, 0.0);
    assert_eq!(summary.mer, 0.0);
    assert_eq!(summary.blended_cac, 0.0);
}

#[test]
fn previous_period_is_the_equal_window_before() {
    let marketing_rows = vec![
        spend_row(1, 50.0, 0.0),
        spend_row(2, 50.0, 0.0),
        spend_row(3, 150.0, 0.0),
        spend_row(4, 50.0, 0.0),
        marketing(3, Channel::TikTok, "Video", "TX", "T", [0.0, 0.0, 999.0, 0.0]),
    ];
    let business_rows: Vec<_> = (1..=4).map(|d| business(d, 1.0, 1.0, 100.0, 50.0)).collect();
    let spec = FilterSpec::default()
        .with_channels(["Google"])
        .with_date_range(day(3), day(4));

    let comparison =
        compare_previous_period(&marketing_rows, &business_rows, &spec, &Targets::default())
            .unwrap();

    assert_eq!(comparison.previous_range.start, day(1));
    assert_eq!(comparison.previous_range.end, day(2));
    assert_eq!(comparison.current.total_spend, 200.0);
    assert_eq!(comparison.previous.total_spend, 100.0);
    assert_eq!(comparison.changes.total_spend, 1.0);
    assert_eq!(comparison.changes.total_revenue, 0.0);
    assert_eq!(comparison.changes.mer, -0.5);
}

#[test]
fn no_comparison_without_a_date_range() {
    let spec = FilterSpec::default();
    assert!(compare_previous_period(
        &[spend_row(1, 1.0, 0.0)],
        &[business(1, 1.0, 1.0, 1.0, 1.0)],
        &spec,
        &Targets::default()
    )
    .is_none());
}

#[test]
fn change_from_zero_is_zero() {
    let spec = FilterSpec::default().with_date_range(day(3), day(3));
    let comparison = compare_previous_period(
        &[spend_row(3, 10.0, 0.0)],
        &[business(3, 1.0, 1.0, 10.0, 5.0)],
        &spec,
        &Targets::default(),
    )
    .unwrap();
    assert_eq!(comparison.previous.total_spend, 0.0);
    assert_eq!(comparison.changes.total_spend, 0.0);
}

#[test]
fn no_comparison_when_the_previous_window_is_unrepresentable() {
    let spec = FilterSpec::default().with_date_range(NaiveDate::MIN, NaiveDate::MAX);
    assert!(compare_previous_period(
        &[spend_row(1, 1.0, 0.0)],
        &[business(1, 1.0, 1.0, 1.0, 1.0)],
        &spec,
        &Targets::default()
    )
    .is_none());

    assert_eq!(DateRange::new(NaiveDate::MIN, NaiveDate::MIN).previous(), None);
    assert_eq!(
        DateRange::new(day(3), day(4)).previous(),
        Some(DateRange::new(day(1), day(2)))
    );
}

//! Unit tests for derived metrics and safe division

use marketing_intel::models::Channel;
use marketing_intel::pipeline::{derive_metrics, Frame};
use marketing_intel::{safe_div, with_derived_metrics};
use proptest::prelude::*;

use crate::fixtures::marketing;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn zero_denominator_is_always_zero(n in proptest::num::f64::ANY) {
        prop_assert_eq!(safe_div(n, 0.0), 0.0);
        prop_assert_eq!(safe_div(n, -0.0), 0.0);
    }

    #[test]
    fn nonzero_denominator_divides(n in -1.0e9f64..1.0e9, d in -1.0e9f64..1.0e9) {
        prop_assume!(d != 0.0);
        prop_assert_eq!(safe_div(n, d), n / d);
    }
}

#[test]
fn zero_volume_row_has_zero_metrics() {
    let row = marketing(1, Channel::Google, "Search", "CA", "C", [0.0, 0.0, 0.0, 0.0]);
    let metrics = derive_metrics(&row);
    assert_eq!(metrics.ctr, 0.0);
    assert_eq!(metrics.cpc, 0.0);
    assert_eq!(metrics.cpm, 0.0);
    assert_eq!(metrics.roas, 0.0);
}

#[test]
fn applying_twice_changes_nothing() {
    let rows = vec![
        marketing(1, Channel::Google, "Search", "CA", "C", [2000.0, 40.0, 50.0, 120.0]),
        marketing(2, Channel::TikTok, "Video", "NY", "D", [0.0, 0.0, 10.0, 0.0]),
    ];
    let once = with_derived_metrics(&rows);
    let twice = with_derived_metrics(&once);
    for (a, b) in once.iter().zip(&twice) {
        assert_eq!(a.metrics, b.metrics);
    }

    let frame = Frame::from_records(&rows).with_derived_metrics();
    let again = frame.with_derived_metrics();
    assert_eq!(frame, again);
    assert_eq!(frame.column("cpm"), vec![Some(25.0), Some(0.0)]);
}

#[test]
fn frame_without_inputs_gets_no_ratio_columns() {
    let frame = Frame::new(Vec::<String>::new(), ["spend"]);
    let derived = frame.with_derived_metrics();
    assert!(!derived.has_column("roas"));
    assert!(!derived.has_column("cpc"));
}

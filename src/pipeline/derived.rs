//! Ratio metrics with the zero-denominator policy.

use crate::models::{AdVolume, Derived, DerivedMetrics};

/// Division where a zero denominator yields `0.0`.
///
/// Used for every ratio in the crate so no NaN or infinity reaches an output table.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// CTR, CPC, CPM and ROAS for one row of advertising volume.
pub fn derive_metrics<R: AdVolume + ?Sized>(row: &R) -> DerivedMetrics {
    DerivedMetrics {
        ctr: safe_div(row.clicks(), row.impressions()),
        cpc: safe_div(row.spend(), row.clicks()),
        cpm: 1000.0 * safe_div(row.spend(), row.impressions()),
        roas: safe_div(row.attributed_revenue(), row.spend()),
    }
}

/// Attach derived metrics to every row. Metrics depend only on the volume primitives, so
/// recomputing them on the same table gives identical values.
pub fn with_derived_metrics<R: AdVolume + Clone>(rows: &[R]) -> Vec<Derived<R>> {
    rows.iter()
        .map(|row| Derived {
            record: row.clone(),
            metrics: derive_metrics(row),
        })
        .collect()
}

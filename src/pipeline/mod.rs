//! Pure transforms over the ingested tables.
//!
//! Every function takes its inputs by reference and returns a new table; nothing is mutated in
//! place, so snapshots can be shared between concurrent readers.

pub mod blend;
pub mod breakdown;
pub mod daily;
pub mod derived;
pub mod filter;
pub mod frame;
pub mod quality;
pub mod summary;
pub mod unified;

pub use blend::{blend, blended_row, lag_business_metrics};
pub use breakdown::{
    breakdown, campaign_breakdown, channel_breakdown, channel_daily_series, state_breakdown,
    tactic_breakdown, top_by, Breakdown, RankBy,
};
pub use daily::aggregate_daily;
pub use derived::{derive_metrics, safe_div, with_derived_metrics};
pub use filter::{available_filter_values, default_date_range, filter, matches};
pub use frame::{lag_shift, per_group, rolling_average, rolling_average_by, Frame, FrameRow};
pub use quality::{cpc_outliers, data_quality_report, DataQualityReport, OutlierStatus};
pub use summary::{
    compare_previous_period, executive_summary, profit_view, trends_view, ExecutiveSummary,
    DayCallout, PeriodComparison, ProfitView, TargetDeltas, TrendsView, ViewOptions,
};
pub use unified::build_unified;

//! Marketing intelligence pipeline.
//!
//! Ingests per-channel advertising exports and a daily business-totals feed, joins them by date and
//! derives the financial and marketing KPIs consumed by the dashboard views.

pub mod cache;
pub mod config;
pub mod core;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod services;

pub use cache::{DataLoader, LoadedData};
pub use error::PipelineError;
pub use pipeline::{
    aggregate_daily, available_filter_values, blend, build_unified, filter, lag_business_metrics,
    lag_shift, rolling_average, safe_div, with_derived_metrics,
};

//! Typed tables flowing through the pipeline.

pub mod business;
pub mod filter;
pub mod kpi;
pub mod marketing;
pub mod record;

pub use business::{BusinessRecord, BusinessTotals};
pub use filter::{DateRange, FilterSpec, FilterValues, Targets};
pub use kpi::{BlendedDailyKpi, Derived, DerivedMetrics};
pub use marketing::{Channel, DailyMarketingAggregate, MarketingRecord};
pub use record::{AdVolume, Dimension, Record};

//! Source ingestion: raw CSV tables normalised into typed records.

pub mod business;
pub mod channel;
pub mod csv_source;
pub mod parse;

use serde::Serialize;

pub use business::{ingest_business, ingest_business_with_stats};
pub use channel::{ingest_channel, ingest_channel_with_stats};
pub use csv_source::{read_raw_table, read_raw_table_path, RawTable};

/// Row accounting for one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub rows_read: usize,
    pub rows_kept: usize,
    /// Rows discarded because the date did not parse.
    pub rows_dropped: usize,
    /// Numeric cells that were missing or unparseable and defaulted to zero.
    pub numeric_defaults: usize,
}

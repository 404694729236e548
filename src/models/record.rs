//! Column access shared by every table kind.
//!
//! Schema-agnostic operations (filtering, rolling, lagging) work against these traits instead of
//! inspecting concrete record types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Categorical columns a table may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Channel,
    Tactic,
    State,
    Campaign,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Channel,
        Dimension::Tactic,
        Dimension::State,
        Dimension::Campaign,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Channel => "channel",
            Dimension::Tactic => "tactic",
            Dimension::State => "state",
            Dimension::Campaign => "campaign",
        }
    }
}

/// A dated row with optional categorical labels and named numeric measures.
pub trait Record {
    fn date(&self) -> NaiveDate;

    /// Label for a dimension, `None` when the table has no such column.
    fn label(&self, _dimension: Dimension) -> Option<&str> {
        None
    }

    /// Categorical columns this table kind carries.
    fn dimensions() -> &'static [Dimension]
    where
        Self: Sized,
    {
        &[]
    }

    /// Numeric columns this table kind carries, in schema order.
    fn measure_names() -> &'static [&'static str]
    where
        Self: Sized;

    fn measure(&self, name: &str) -> Option<f64>;
}

/// Advertising volume primitives the ratio metrics are derived from.
pub trait AdVolume {
    fn impressions(&self) -> f64;
    fn clicks(&self) -> f64;
    fn spend(&self) -> f64;
    fn attributed_revenue(&self) -> f64;
}

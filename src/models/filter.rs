use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, zero for an inverted range.
    pub fn days(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(0)
    }

    /// The window of equal length ending the day before this one starts.
    ///
    /// `None` when that window would fall before the earliest representable date.
    pub fn previous(&self) -> Option<Self> {
        let len = chrono::Duration::try_days(self.days())?;
        let end = self.start.checked_sub_signed(chrono::Duration::days(1))?;
        let start = self.start.checked_sub_signed(len)?;
        Some(Self { start, end })
    }
}

/// Allow-lists and date window applied to any table.
///
/// Empty lists place no restriction on their dimension. `date_range` only applies when it holds
/// exactly two dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub tactics: Vec<String>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub date_range: Vec<NaiveDate>,
}

impl FilterSpec {
    pub fn with_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channels = channels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tactics<I, S>(mut self, tactics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tactics = tactics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = vec![start, end];
        self
    }

    pub fn date_bounds(&self) -> Option<DateRange> {
        match self.date_range.as_slice() {
            [start, end] => Some(DateRange::new(*start, *end)),
            _ => None,
        }
    }
}

/// Sorted distinct values available for each filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterValues {
    pub channels: Vec<String>,
    pub tactics: Vec<String>,
    pub states: Vec<String>,
    pub campaigns: Vec<String>,
}

/// Optional goals the summary reports deltas against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    #[serde(default)]
    pub mer: Option<f64>,
    #[serde(default)]
    pub cac: Option<f64>,
    #[serde(default)]
    pub roas: Option<f64>,
    #[serde(default)]
    pub profit_roas: Option<f64>,
}

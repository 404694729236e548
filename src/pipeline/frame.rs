//! Schema-agnostic time-series container for rolling and lag transforms.
//!
//! A [`Frame`] holds dated rows with named categorical labels and named numeric columns whose
//! values may be missing. Typed tables convert into frames through [`Record`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::derived::safe_div;
use crate::models::{Dimension, Record};

#[derive(Debug, Clone, PartialEq)]
pub struct FrameRow {
    pub date: NaiveDate,
    pub labels: BTreeMap<String, String>,
    pub values: BTreeMap<String, Option<f64>>,
}

impl FrameRow {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            labels: BTreeMap::new(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, name: &str, value: impl Into<String>) -> Self {
        self.labels.insert(name.to_string(), value.into());
        self
    }

    pub fn with_value(mut self, name: &str, value: Option<f64>) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    /// Value of a column, `None` when absent or missing.
    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied().flatten()
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }
}

impl Record for FrameRow {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn label(&self, dimension: Dimension) -> Option<&str> {
        self.labels.get(dimension.as_str()).map(String::as_str)
    }

    fn measure_names() -> &'static [&'static str] {
        &[]
    }

    fn measure(&self, name: &str) -> Option<f64> {
        self.value(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    labels: Vec<String>,
    columns: Vec<String>,
    rows: Vec<FrameRow>,
}

impl Frame {
    pub fn new<L, C>(labels: L, columns: C) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Frame carrying every dimension and measure of a typed table.
    pub fn from_records<R: Record>(records: &[R]) -> Self {
        let labels: Vec<&str> = R::dimensions().iter().map(Dimension::as_str).collect();
        let mut frame = Frame::new(labels, R::measure_names().iter().copied());
        for record in records {
            let mut row = FrameRow::new(record.date());
            for dimension in R::dimensions() {
                if let Some(value) = record.label(*dimension) {
                    row.labels.insert(dimension.as_str().to_string(), value.to_string());
                }
            }
            for name in R::measure_names() {
                row.values.insert(name.to_string(), record.measure(name));
            }
            frame.rows.push(row);
        }
        frame
    }

    pub fn push(&mut self, row: FrameRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[FrameRow] {
        &self.rows
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column in row order.
    pub fn column(&self, name: &str) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.value(name)).collect()
    }

    /// Copy ordered by date; rows sharing a date keep their relative order.
    pub fn sorted_by_date(&self) -> Frame {
        let mut out = self.clone();
        out.rows.sort_by_key(|row| row.date);
        out
    }

    pub fn filter(&self, spec: &crate::models::FilterSpec) -> Frame {
        Frame {
            labels: self.labels.clone(),
            columns: self.columns.clone(),
            rows: super::filter::filter(&self.rows, spec),
        }
    }

    /// Add CTR, CPC, CPM and ROAS for each ratio whose input columns exist.
    ///
    /// Missing inputs on a row are read as zero. Ratios are always recomputed from the
    /// primitives, so applying this twice changes nothing.
    pub fn with_derived_metrics(&self) -> Frame {
        const RATIOS: [(&str, &str, &str, f64); 4] = [
            ("ctr", "clicks", "impressions", 1.0),
            ("cpc", "spend", "clicks", 1.0),
            ("cpm", "spend", "impressions", 1000.0),
            ("roas", "attributed_revenue", "spend", 1.0),
        ];

        let mut out = self.clone();
        for (name, numerator, denominator, scale) in RATIOS {
            if !self.has_column(numerator) || !self.has_column(denominator) {
                continue;
            }
            if !out.has_column(name) {
                out.columns.push(name.to_string());
            }
            for row in &mut out.rows {
                let n = row.value(numerator).unwrap_or(0.0);
                let d = row.value(denominator).unwrap_or(0.0);
                row.values
                    .insert(name.to_string(), Some(scale * safe_div(n, d)));
            }
        }
        out
    }

    /// Stack frames, unioning their schemas in first-seen order.
    pub fn concat<I: IntoIterator<Item = Frame>>(parts: I) -> Frame {
        let mut out = Frame::default();
        for part in parts {
            for label in part.labels {
                if !out.labels.contains(&label) {
                    out.labels.push(label);
                }
            }
            for column in part.columns {
                if !out.columns.contains(&column) {
                    out.columns.push(column);
                }
            }
            out.rows.extend(part.rows);
        }
        out
    }
}

/// Trailing mean over `window` rows in date order.
///
/// Early rows average over however many rows exist so far, and missing values are skipped, so a
/// row only stays missing when its whole window is missing. `window` of 0 or 1 leaves values as
/// they are.
pub fn rolling_average(frame: &Frame, columns: &[&str], window: usize) -> Frame {
    let mut out = frame.sorted_by_date();
    if window <= 1 {
        return out;
    }

    let present_columns: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|c| out.has_column(c))
        .collect();
    for column in present_columns {
        let original = out.column(column);
        for (i, row) in out.rows.iter_mut().enumerate() {
            let start = (i + 1).saturating_sub(window);
            let observed: Vec<f64> = original[start..=i].iter().flatten().copied().collect();
            let mean = if observed.is_empty() {
                None
            } else {
                Some(observed.iter().sum::<f64>() / observed.len() as f64)
            };
            row.values.insert(column.to_string(), mean);
        }
    }
    out
}

/// Move column values `days` rows later in date order; the first `days` rows become missing.
pub fn lag_shift(frame: &Frame, columns: &[&str], days: usize) -> Frame {
    let mut out = frame.sorted_by_date();
    if days == 0 {
        return out;
    }

    let present_columns: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|c| out.has_column(c))
        .collect();
    for column in present_columns {
        let original = out.column(column);
        for (i, row) in out.rows.iter_mut().enumerate() {
            let shifted = i.checked_sub(days).and_then(|j| original[j]);
            row.values.insert(column.to_string(), shifted);
        }
    }
    out
}

/// Apply `transform` to each group of rows sharing the `group_key` label and stack the results.
///
/// Groups are processed independently and emitted in label order; rows without the label form
/// their own group first. A frame that does not carry the label is transformed as one group.
pub fn per_group<F>(frame: &Frame, group_key: &str, transform: F) -> Frame
where
    F: Fn(&Frame) -> Frame,
{
    if !frame.has_label(group_key) {
        return transform(frame);
    }

    let mut groups: BTreeMap<Option<String>, Frame> = BTreeMap::new();
    for row in &frame.rows {
        let key = row.label(group_key).map(str::to_string);
        groups
            .entry(key)
            .or_insert_with(|| Frame {
                labels: frame.labels.clone(),
                columns: frame.columns.clone(),
                rows: Vec::new(),
            })
            .rows
            .push(row.clone());
    }

    Frame::concat(groups.values().map(&transform))
}

/// [`rolling_average`] computed separately within each `group_key` group.
pub fn rolling_average_by(frame: &Frame, group_key: &str, columns: &[&str], window: usize) -> Frame {
    per_group(frame, group_key, |group| {
        rolling_average(group, columns, window)
    })
}

impl Serialize for FrameRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.labels.len() + self.values.len()))?;
        map.serialize_entry("date", &self.date)?;
        for (name, value) in &self.labels {
            map.serialize_entry(name, value)?;
        }
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Frame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

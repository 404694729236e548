//! Allow-list and date-window filtering shared by every table kind.

use std::collections::BTreeSet;

use chrono::Duration;

use crate::models::{DateRange, Dimension, FilterSpec, FilterValues, MarketingRecord, Record};

/// Rows of `rows` that pass `spec`.
///
/// A dimension the table does not carry is never filtered on, so the same spec can be applied
/// to marketing, business and blended tables alike.
pub fn filter<R: Record + Clone>(rows: &[R], spec: &FilterSpec) -> Vec<R> {
    rows.iter().filter(|row| matches(*row, spec)).cloned().collect()
}

pub fn matches<R: Record>(row: &R, spec: &FilterSpec) -> bool {
    allowed(row.label(Dimension::Channel), &spec.channels)
        && allowed(row.label(Dimension::Tactic), &spec.tactics)
        && allowed(row.label(Dimension::State), &spec.states)
        && spec
            .date_bounds()
            .map_or(true, |range| range.contains(row.date()))
}

fn allowed(label: Option<&str>, allow_list: &[String]) -> bool {
    if allow_list.is_empty() {
        return true;
    }
    match label {
        Some(value) => allow_list.iter().any(|allowed| allowed == value),
        None => true,
    }
}

/// Sorted distinct non-blank values per filter dimension.
pub fn available_filter_values(rows: &[MarketingRecord]) -> FilterValues {
    let collect = |dimension: Dimension| -> Vec<String> {
        rows.iter()
            .filter_map(|row| row.label(dimension))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    };

    FilterValues {
        channels: collect(Dimension::Channel),
        tactics: collect(Dimension::Tactic),
        states: collect(Dimension::State),
        campaigns: collect(Dimension::Campaign),
    }
}

/// The trailing `lookback_days` window ending at the latest date, clamped to the earliest date.
pub fn default_date_range<R: Record>(rows: &[R], lookback_days: i64) -> Option<DateRange> {
    let first = rows.iter().map(Record::date).min()?;
    let last = rows.iter().map(Record::date).max()?;
    let start = Duration::try_days(lookback_days)
        .and_then(|lookback| last.checked_sub_signed(lookback))
        .map_or(first, |start| start.max(first));
    Some(DateRange::new(start, last))
}

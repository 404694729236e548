//! Lenient cell parsers used during ingestion.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Calendar date from a cell, `None` when no supported format matches.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Finite number from a cell, `None` for blanks, junk, NaN and infinities.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn clean_text(raw: &str) -> String {
    raw.trim().to_string()
}

/// Running parse of numeric cells that defaults to zero and counts the defaults.
#[derive(Debug, Default)]
pub(crate) struct NumericCells {
    pub defaulted: usize,
}

impl NumericCells {
    pub fn read(&mut self, raw: &str) -> f64 {
        match parse_number(raw) {
            Some(v) => v,
            None => {
                self.defaulted += 1;
                0.0
            }
        }
    }
}

//! Date cell decoding.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use coulage_types::CellValue;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Formats accepted after the `DD/MM/YYYY` attempt fails.
const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
];
const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

fn serial_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Converts a spreadsheet serial day count (epoch 1899-12-30) into a date.
/// Fractional days carry the time of day and are dropped.
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let millis = (serial * MILLIS_PER_DAY).round() as i64;
    let epoch = serial_epoch()?;
    epoch
        .checked_add_signed(Duration::try_milliseconds(millis)?)
        .map(|dt| dt.date())
}

/// Parses `DD/MM/YYYY` strictly: three numeric parts, month 1 to 12 and a
/// day that exists in that month.
pub fn parse_day_month_year(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };
    let day = day.trim().parse::<u32>().ok()?;
    let month = month.trim().parse::<u32>().ok()?;
    let year = year.trim().parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Generic calendar-date parsing for text that is not `DD/MM/YYYY`.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    FALLBACK_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            FALLBACK_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Decodes a date cell: numbers as serial dates, text as `DD/MM/YYYY`
/// first and then as a generic calendar date.
pub fn parse_cell(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Number(n) => from_serial(*n),
        CellValue::Text(s) => parse_day_month_year(s).or_else(|| parse_calendar_date(s)),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// Zero-padded `DD/MM/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

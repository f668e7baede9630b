//! Calendar helpers shared by the parsers and the time-series buckets.

use chrono::{Datelike, Duration, NaiveDate};

/// `YYYY-MM-DD`
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM`
pub fn format_iso_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the following month.
pub fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Inclusive `(first, last)` day range of a `YYYY-MM` label.
pub fn month_bounds(label: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (year, month) = label.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = next_month(first)?.pred_opt()?;
    Some((first, last))
}

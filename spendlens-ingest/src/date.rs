//! Free-form date parsing for statement exports.
//!
//! Three strategies are tried in order and the first valid calendar date wins:
//! a generic pass over common layouts, `M/D/YY[YY]`, then `YYYY-M-D`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%a, %d %b %Y",
    "%a %b %d %Y",
];

const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];

/// Parse a date cell. Blank or unrecognized input yields `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }
    parse_generic(s)
        .or_else(|| parse_slash_mdy(s))
        .or_else(|| parse_dash_ymd(s))
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    let date = DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| DateTime::parse_from_rfc2822(s).map(|dt| dt.date_naive()).ok())
        .or_else(|| {
            DATETIME_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DATE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(s, layout).ok())
        })?;

    // chrono's %Y accepts short years ("3/5/24" -> year 24); leave those to
    // the two-digit-year rule below.
    if (1000..=9999).contains(&date.year()) {
        Some(date)
    } else {
        None
    }
}

fn all_digits(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
}

/// `M/D/YY` or `M/D/YYYY`; two-digit years land in the 2000s.
fn parse_slash_mdy(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split('/').collect();
    let [m, d, y] = parts.as_slice() else {
        return None;
    };
    if !all_digits(m, 1, 2) || !all_digits(d, 1, 2) || !all_digits(y, 2, 4) {
        return None;
    }
    let mut year: i32 = y.parse().ok()?;
    if y.len() == 2 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, m.parse().ok()?, d.parse().ok()?)
}

/// `YYYY-M-D`
fn parse_dash_ymd(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split('-').collect();
    let [y, m, d] = parts.as_slice() else {
        return None;
    };
    if !all_digits(y, 4, 4) || !all_digits(m, 1, 2) || !all_digits(d, 1, 2) {
        return None;
    }
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

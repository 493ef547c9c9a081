//! Date normalization for report text fields.
//!
//! Upstream extraction emits both a legacy `MM/DD/YYYY` form and the current
//! `YYYY-MM-DD` form; callers never need to know which one a field uses.

use chrono::{DateTime, Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static US_SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid regex"));

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("valid regex"));

/// Formats tried, in order, once neither canonical pattern matched.
const GENERIC_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y%m%d",
];

/// Parse a free-text date. Returns `None` for anything that is not a real
/// calendar date; never panics.
///
/// 1. `DD/DD/DDDD` (whole string) is read as month/day/year.
/// 2. `YYYY-MM-DD` anywhere in the string.
/// 3. Generic formats over the whole string, then RFC 3339 timestamps.
pub fn parse(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = US_SLASH_DATE.captures(text) {
        return ymd(&caps[3], &caps[1], &caps[2]);
    }

    if let Some(caps) = ISO_DATE.captures(text) {
        return ymd(&caps[1], &caps[2], &caps[3]);
    }

    GENERIC_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Parse an optional field; absent text is "no date".
pub fn parse_opt(text: Option<&str>) -> Option<NaiveDate> {
    text.and_then(parse)
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Calendar-month distance from `from` to `to`. Day of month is ignored.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (i64::from(to.year()) - i64::from(from.year())) * 12
        + (i64::from(to.month()) - i64::from(from.month()))
}

/// Whole-day distance from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Completed years from `from` to `to`, anniversary-aware. Negative spans yield 0.
pub fn whole_years_between(from: NaiveDate, to: NaiveDate) -> i64 {
    if to < from {
        return 0;
    }
    let mut years = i64::from(to.year()) - i64::from(from.year());
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years
}

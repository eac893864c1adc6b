//! Calendar-day helpers for the date navigator.
//!
//! Every function here works on [`NaiveDate`], i.e. a local calendar day with
//! no time-of-day component. Callers truncate `DateTime`s with
//! `date_naive()` before calling in, so day differences are always whole
//! calendar days and never depend on DST transitions.

use chrono::{Datelike, NaiveDate};

/// Format a date as the zero-padded `YYYY-MM-DD` key used to address news files.
///
/// # Examples
///
/// ```ignore
/// let d = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
/// assert_eq!(format_key(d), "2026-01-07");
/// ```
pub fn format_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a `YYYY-MM-DD` key back into a date.
///
/// Returns `None` for anything that is not a valid calendar day in that exact
/// shape (file names such as `index.json` in the data directory, typos on the
/// command line).
pub fn parse_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Human label shown in the date navigator.
///
/// * `今日` when `date` is `today`
/// * `昨日` when `date` is exactly one calendar day before `today`
/// * `M月D日` otherwise
pub fn format_label(date: NaiveDate, today: NaiveDate) -> String {
    match days_between(date, today) {
        0 => "今日".to_string(),
        1 => "昨日".to_string(),
        _ => format!("{}月{}日", date.month(), date.day()),
    }
}

/// Year/month/day equality.
pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// Whether `date` lies inside the backward lookback window.
///
/// True iff fewer than `max_days_back` whole days separate `date` from
/// `today`. Future dates give a negative difference and are therefore also
/// "within range"; forward movement is bounded by the navigator, not here.
pub fn is_within_range(date: NaiveDate, today: NaiveDate, max_days_back: i64) -> bool {
    days_between(date, today) < max_days_back
}

/// Whole calendar days from `date` up to `today` (negative for future dates).
pub fn days_between(date: NaiveDate, today: NaiveDate) -> i64 {
    today.signed_duration_since(date).num_days()
}

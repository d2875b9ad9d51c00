//! Calendar arithmetic on `NaiveDate`. Weeks start on Sunday.

use chrono::{Datelike, Duration, Months, NaiveDate};

/// Years accepted from callers. Arithmetic below stays clear of chrono's limits.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Cells in a month view: six Sunday-first weeks.
pub const MONTH_GRID_DAYS: usize = 42;

pub fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

pub fn last_of_month(day: NaiveDate) -> NaiveDate {
    first_of_month(day)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// First day of the month `delta` months away from `day`'s month. Saturates
/// at the edges of the representable range.
pub fn shift_month(day: NaiveDate, delta: i32) -> NaiveDate {
    let first = first_of_month(day);
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    };
    shifted.unwrap_or(first)
}

pub fn start_of_week(day: NaiveDate) -> NaiveDate {
    day.checked_sub_signed(Duration::days(i64::from(
        day.weekday().num_days_from_sunday(),
    )))
    .unwrap_or(NaiveDate::MIN)
}

pub fn end_of_week(day: NaiveDate) -> NaiveDate {
    start_of_week(day)
        .checked_add_signed(Duration::days(6))
        .unwrap_or(NaiveDate::MAX)
}

/// The seven days of the week containing `day`.
pub fn week_days(day: NaiveDate) -> Vec<NaiveDate> {
    start_of_week(day).iter_days().take(7).collect()
}

/// Six weeks starting on the Sunday on or before the 1st of `month`'s month.
pub fn month_grid(month: NaiveDate) -> Vec<NaiveDate> {
    start_of_week(first_of_month(month))
        .iter_days()
        .take(MONTH_GRID_DAYS)
        .collect()
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// "June 2024"
pub fn month_label(month: NaiveDate) -> String {
    month.format("%B %Y").to_string()
}

pub fn in_supported_range(day: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&day.year())
}

/// Parses `yyyy-MM-dd`, or the date part of an RFC 3339 timestamp. Years
/// outside `MIN_YEAR..=MAX_YEAR` are rejected.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| ts.date_naive())
        })
        .filter(|day| in_supported_range(*day))
}

//! Calendar-month arithmetic with day clamping.
//!
//! Every month-based computation in the engine goes through here so that a
//! day-of-month anchor past the end of a month (31 in April, 29-31 in
//! February) lands on that month's last day.

use chrono::{Datelike, Days, NaiveDate};

/// A date produced from a requested day-of-month, possibly clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedDay {
    pub date: NaiveDate,
    pub requested_day: u32,
}

impl ClampedDay {
    /// True when the requested day did not exist in the target month.
    pub fn was_clamped(&self) -> bool {
        self.date.day() != self.requested_day
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Builds `year-month-day`, clamping `day` to the month length.
///
/// Returns `None` when the year is outside chrono's supported range or the
/// month is not 1-12.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<ClampedDay> {
    let last = days_in_month(year, month);
    if last == 0 {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year, month, day.clamp(1, last))?;
    Some(ClampedDay {
        date,
        requested_day: day,
    })
}

/// Months since year 0, used to step through cycles without caring about
/// year boundaries.
pub fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Inverse of [`month_index`], placing the result on `day` (clamped).
pub fn from_month_index(index: i64, day: u32) -> Option<ClampedDay> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    clamped_date(year, month, day)
}

/// Shifts `date` by `months` calendar months, landing on `anchor_day`
/// clamped to the target month.
pub fn add_months(date: NaiveDate, months: i64, anchor_day: u32) -> Option<ClampedDay> {
    let index = month_index(date).checked_add(months)?;
    from_month_index(index, anchor_day)
}

pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

pub fn sub_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(days))
}

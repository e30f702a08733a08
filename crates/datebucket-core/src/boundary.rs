//! Year-boundary correction for ISO week grouping.
//!
//! ISO week 1 of a year can start as early as December 29th of the
//! previous year, and the last days of a year's week 52/53 can spill into
//! January of the next one. Week buckets are filed under the year the week
//! belongs to, not the calendar year of the day that was looked at.
//!
//! Fortnight and month grouping use the calendar year directly and never
//! pass through here.

use chrono::{Datelike, NaiveDate};

use crate::calendar::iso_week_of;
use crate::models::WeekKey;

/// The year a date's ISO week is grouped under.
///
/// A December day in week 1 belongs to the next year; a January day in
/// week 52 or 53 belongs to the previous one.
///
/// ```
/// use chrono::NaiveDate;
/// use datebucket_core::boundary::grouping_year;
///
/// let date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
/// assert_eq!(grouping_year(&date), 2025);
///
/// // 2021 starts on a Friday, so its first days still belong to 2020-W53.
/// let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
/// assert_eq!(grouping_year(&date), 2020);
/// ```
pub fn grouping_year<D: Datelike>(date: &D) -> i32 {
    let year = date.year();
    match (iso_week_of(date), date.month()) {
        (1, 12) => year + 1,
        (52 | 53, 1) => year - 1,
        _ => year,
    }
}

/// The week bucket a date falls into.
pub fn week_key(date: NaiveDate) -> WeekKey {
    WeekKey {
        year: grouping_year(&date),
        week: iso_week_of(&date),
    }
}

//! Calendar primitives.
//!
//! Pure conversions between calendar dates, ISO weeks, ordinal days and
//! absolute instants. Everything here returns a new value; nothing borrows
//! from or mutates its arguments.
//!
//! Instants are flat UTC time: adding a day always adds exactly 86 400
//! seconds.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Utc, Weekday};

use crate::error::{DateBucketError, Result};

/// An absolute point in time.
pub type Instant = DateTime<Utc>;

/// Shift an instant by `n` whole days (negative `n` moves backwards).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use datebucket_core::calendar::add_days;
///
/// let instant = Utc.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).single().unwrap();
/// let later = add_days(instant, 2).unwrap();
/// assert_eq!(later, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().unwrap());
/// ```
pub fn add_days(instant: Instant, n: i64) -> Result<Instant> {
    TimeDelta::try_days(n)
        .and_then(|delta| instant.checked_add_signed(delta))
        .ok_or_else(|| DateBucketError::OutOfRange(format!("{instant} shifted by {n} days")))
}

/// Truncate an instant to 00:00:00 of its day.
pub fn start_of_day(instant: Instant) -> Instant {
    instant_of(instant.date_naive())
}

/// The instant at which `date` begins.
pub fn instant_of(date: NaiveDate) -> Instant {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Number of calendar days between two dates, regardless of their order.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days().abs()
}

/// Number of whole weeks between two dates, regardless of their order.
pub fn weeks_between(a: NaiveDate, b: NaiveDate) -> i64 {
    days_between(a, b) / 7
}

/// Elapsed hours from `a` to `b`. Negative when `b` is earlier than `a`.
pub fn hours_between(a: Instant, b: Instant) -> f64 {
    b.signed_duration_since(a).num_milliseconds() as f64 / 3_600_000.0
}

/// Whether `year` has a February 29th.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `year` (365 or 366).
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Number of days in `month` of `year`.
pub fn days_in_month(month: u32, year: i32) -> Result<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Ok(31),
        4 | 6 | 9 | 11 => Ok(30),
        2 if is_leap_year(year) => Ok(29),
        2 => Ok(28),
        _ => Err(invalid_month(month)),
    }
}

/// The first day of `month` in `year`.
pub fn first_day_of_month(month: u32, year: i32) -> Result<NaiveDate> {
    day_of_month(1, month, year)
}

/// The last day of `month` in `year`, leap years included.
///
/// ```
/// use chrono::NaiveDate;
/// use datebucket_core::calendar::last_day_of_month;
///
/// assert_eq!(last_day_of_month(2, 2024).unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert_eq!(last_day_of_month(2, 2023).unwrap(), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
/// ```
pub fn last_day_of_month(month: u32, year: i32) -> Result<NaiveDate> {
    day_of_month(days_in_month(month, year)?, month, year)
}

/// The date `day`/`month`/`year`.
pub fn day_of_month(day: u32, month: u32, year: i32) -> Result<NaiveDate> {
    let max_day = days_in_month(month, year)?;
    if day == 0 || day > max_day {
        return Err(DateBucketError::InvalidCalendarInput(format!(
            "day {day} does not exist in {year}-{month:02} (max {max_day})"
        )));
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        DateBucketError::OutOfRange(format!("{year}-{month:02}-{day:02} is not representable"))
    })
}

/// The `ordinal`-th day of `year`, where ordinal 1 is January 1st.
pub fn day_of_year(ordinal: u32, year: i32) -> Result<NaiveDate> {
    let max_ordinal = days_in_year(year);
    if ordinal == 0 || ordinal > max_ordinal {
        return Err(DateBucketError::InvalidCalendarInput(format!(
            "day of year {ordinal} does not exist in {year} (max {max_ordinal})"
        )));
    }
    NaiveDate::from_yo_opt(year, ordinal).ok_or_else(|| {
        DateBucketError::OutOfRange(format!("day {ordinal} of {year} is not representable"))
    })
}

/// ISO 8601 week number (1..=53) of a date.
pub fn iso_week_of<D: Datelike>(date: &D) -> u32 {
    date.iso_week().week()
}

/// Calendar year of a date.
pub fn year_of<D: Datelike>(date: &D) -> i32 {
    date.year()
}

/// Calendar month (1..=12) of a date.
pub fn month_of<D: Datelike>(date: &D) -> u32 {
    date.month()
}

/// Day of the year (1..=366) of a date.
pub fn ordinal_day_of<D: Datelike>(date: &D) -> u32 {
    date.ordinal()
}

/// Year-relative fortnight index (0..=24): 15-day slices counted from January 1st.
pub fn date_fortnight<D: Datelike>(date: &D) -> u32 {
    date.ordinal0() / 15
}

/// Quarter (1..=4) of a date.
pub fn date_quarter<D: Datelike>(date: &D) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// Monday of ISO week `week` of `year`.
///
/// ISO week 1 may start in the previous December:
///
/// ```
/// use chrono::NaiveDate;
/// use datebucket_core::calendar::first_day_of_week;
///
/// let monday = first_day_of_week(1, 2025).unwrap();
/// assert_eq!(monday, NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
/// ```
pub fn first_day_of_week(week: u32, year: i32) -> Result<NaiveDate> {
    iso_week_day(week, year, Weekday::Mon)
}

/// Sunday of ISO week `week` of `year`.
pub fn last_day_of_week(week: u32, year: i32) -> Result<NaiveDate> {
    iso_week_day(week, year, Weekday::Sun)
}

/// The seven days, Monday through Sunday, of ISO week `week` of `year`.
pub fn days_of_week(week: u32, year: i32) -> Result<[NaiveDate; 7]> {
    let monday = first_day_of_week(week, year)?;
    // Sunday must exist too, otherwise the week runs off the calendar.
    last_day_of_week(week, year)?;
    // Every offset up to Sunday is representable past this point.
    Ok(std::array::from_fn(|offset| monday + TimeDelta::days(offset as i64)))
}

fn iso_week_day(week: u32, year: i32, weekday: Weekday) -> Result<NaiveDate> {
    if let Some(date) = NaiveDate::from_isoywd_opt(year, week, weekday) {
        return Ok(date);
    }
    let missing = || {
        DateBucketError::InvalidCalendarInput(format!("ISO week {week} does not exist in {year}"))
    };
    if week == 0 || week > 53 {
        return Err(missing());
    }
    // December 28th always lies in the last ISO week of its year.
    match NaiveDate::from_ymd_opt(year, 12, 28) {
        Some(dec28) if week > dec28.iso_week().week() => Err(missing()),
        _ => Err(DateBucketError::OutOfRange(format!(
            "ISO week {week} of {year} is not representable"
        ))),
    }
}

fn invalid_month(month: u32) -> DateBucketError {
    DateBucketError::InvalidCalendarInput(format!("month {month} is not in 1..=12"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn add_days_is_flat_24h_arithmetic() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 30, 23, 30, 0).single().unwrap();
        let shifted = add_days(instant, 1).unwrap();
        assert_eq!(
            shifted,
            Utc.with_ymd_and_hms(2024, 3, 31, 23, 30, 0).single().unwrap()
        );
        assert_eq!(add_days(shifted, -1).unwrap(), instant);
    }

    #[test]
    fn add_days_overflow_is_reported() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap();
        let result = add_days(instant, i64::MAX);
        assert!(matches!(result, Err(DateBucketError::OutOfRange(_))));
    }

    #[test]
    fn start_of_day_truncates_time() {
        let instant = Utc.with_ymd_and_hms(2024, 5, 17, 18, 45, 12).single().unwrap();
        assert_eq!(
            start_of_day(instant),
            Utc.with_ymd_and_hms(2024, 5, 17, 0, 0, 0).single().unwrap()
        );
    }

    #[test]
    fn days_between_is_symmetric() {
        let a = date(2023, 12, 25);
        let b = date(2024, 3, 1);
        assert_eq!(days_between(a, b), 67);
        assert_eq!(days_between(b, a), 67);
        assert_eq!(days_between(a, a), 0);
    }

    #[test]
    fn weeks_between_floors() {
        assert_eq!(weeks_between(date(2024, 1, 1), date(2024, 1, 14)), 1);
        assert_eq!(weeks_between(date(2024, 1, 1), date(2024, 1, 15)), 2);
    }

    #[test]
    fn hours_between_signed() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 2, 6, 30, 0).single().unwrap();
        assert_eq!(hours_between(a, b), 30.5);
        assert_eq!(hours_between(b, a), -30.5);
    }

    #[test]
    fn last_day_of_month_handles_leap_years() {
        assert_eq!(last_day_of_month(2, 2024).unwrap(), date(2024, 2, 29));
        assert_eq!(last_day_of_month(2, 2023).unwrap(), date(2023, 2, 28));
        assert_eq!(last_day_of_month(2, 1900).unwrap(), date(1900, 2, 28));
        assert_eq!(last_day_of_month(2, 2000).unwrap(), date(2000, 2, 29));
        assert_eq!(last_day_of_month(4, 2024).unwrap(), date(2024, 4, 30));
        assert_eq!(last_day_of_month(12, 2024).unwrap(), date(2024, 12, 31));
    }

    #[test]
    fn invalid_month_rejected() {
        assert!(matches!(
            first_day_of_month(13, 2024),
            Err(DateBucketError::InvalidCalendarInput(_))
        ));
        assert!(matches!(
            last_day_of_month(0, 2024),
            Err(DateBucketError::InvalidCalendarInput(_))
        ));
    }

    #[test]
    fn invalid_day_rejected() {
        assert!(day_of_month(29, 2, 2023).is_err());
        assert!(day_of_month(0, 1, 2023).is_err());
        assert_eq!(day_of_month(29, 2, 2024).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn day_of_year_counts_from_january_first() {
        assert_eq!(day_of_year(1, 2024).unwrap(), date(2024, 1, 1));
        assert_eq!(day_of_year(60, 2024).unwrap(), date(2024, 2, 29));
        assert_eq!(day_of_year(366, 2024).unwrap(), date(2024, 12, 31));
        assert!(day_of_year(366, 2023).is_err());
        assert!(day_of_year(0, 2023).is_err());
    }

    #[test]
    fn accessors() {
        let d = date(2024, 8, 15);
        assert_eq!(year_of(&d), 2024);
        assert_eq!(month_of(&d), 8);
        assert_eq!(ordinal_day_of(&d), 228);
        assert_eq!(iso_week_of(&d), 33);
        assert_eq!(date_quarter(&d), 3);
        assert_eq!(date_fortnight(&d), 15);
    }

    #[test]
    fn date_fortnight_boundaries() {
        assert_eq!(date_fortnight(&date(2024, 1, 15)), 0);
        assert_eq!(date_fortnight(&date(2024, 1, 16)), 1);
        assert_eq!(date_fortnight(&date(2023, 12, 31)), 24);
        assert_eq!(date_fortnight(&date(2024, 12, 31)), 24);
    }

    #[test]
    fn date_quarter_boundaries() {
        assert_eq!(date_quarter(&date(2024, 3, 31)), 1);
        assert_eq!(date_quarter(&date(2024, 4, 1)), 2);
        assert_eq!(date_quarter(&date(2024, 9, 30)), 3);
        assert_eq!(date_quarter(&date(2024, 12, 1)), 4);
    }

    #[test]
    fn iso_week_days() {
        assert_eq!(first_day_of_week(1, 2025).unwrap(), date(2024, 12, 30));
        assert_eq!(last_day_of_week(1, 2025).unwrap(), date(2025, 1, 5));
        assert_eq!(first_day_of_week(53, 2020).unwrap(), date(2020, 12, 28));
        assert_eq!(last_day_of_week(53, 2020).unwrap(), date(2021, 1, 3));
        assert_eq!(first_day_of_week(1, 2021).unwrap(), date(2021, 1, 4));
        assert_eq!(first_day_of_week(1, 2020).unwrap(), date(2019, 12, 30));
    }

    #[test]
    fn nonexistent_iso_week_rejected() {
        assert!(first_day_of_week(53, 2021).is_err());
        assert!(first_day_of_week(0, 2021).is_err());
        assert!(days_of_week(54, 2020).is_err());
        assert!(matches!(
            first_day_of_week(53, 2021),
            Err(DateBucketError::InvalidCalendarInput(_))
        ));
    }

    #[test]
    fn iso_week_beyond_calendar_is_out_of_range() {
        assert!(matches!(
            first_day_of_week(1, 262_144),
            Err(DateBucketError::OutOfRange(_))
        ));
        assert!(matches!(
            days_of_week(1, NaiveDate::MAX.year() + 1),
            Err(DateBucketError::OutOfRange(_))
        ));
        assert!(matches!(
            first_day_of_week(0, 262_144),
            Err(DateBucketError::InvalidCalendarInput(_))
        ));
    }

    #[test]
    fn days_of_week_runs_monday_to_sunday() {
        let days = days_of_week(9, 2024).unwrap();
        assert_eq!(days[0], date(2024, 2, 26));
        assert_eq!(days[3], date(2024, 2, 29));
        assert_eq!(days[6], date(2024, 3, 3));
        assert!(days.iter().all(|d| iso_week_of(d) == 9));
    }

    #[test]
    fn days_in_year_and_month() {
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2100), 365);
        assert_eq!(days_in_month(9, 2024).unwrap(), 30);
        assert!(days_in_month(14, 2024).is_err());
    }
}

//! Core data types for datebucket.
//!
//! This module defines the primary types used throughout the library:
//! - [`GroupFormat`] / [`FortnightFormat`] - Output shape selectors
//! - [`WeekKey`], [`MonthKey`], [`MonthFortnightKey`], [`YearFortnightKey`] - Bucket keys
//! - [`BucketRecord`] - A bucket with its bounding days and a data slot
//! - [`Grouped`] / [`FortnightGrouping`] - Assembled results
//! - [`DateRange`] - A validated `[start, end]` pair

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::Value;

use crate::calendar::{
    date_fortnight, day_of_month, day_of_year, days_in_year, first_day_of_month,
    first_day_of_week, last_day_of_month, last_day_of_week,
};
use crate::error::{DateBucketError, Result};

/// Highest year-relative fortnight index.
pub const LAST_YEAR_FORTNIGHT: u32 = 24;

/// Length of a year-relative fortnight slice in days.
pub const FORTNIGHT_DAYS: u32 = 15;

/// Output shape for week and month grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupFormat {
    /// `{year: {unit: null}}` (code 0)
    #[default]
    ByBucketMap,
    /// `{year: [unit, ...]}` (code 1)
    ByYearList,
    /// `[{year, unit, first_day, last_day, data}]` (code 2)
    RecordList,
}

impl GroupFormat {
    /// Resolve a numeric format code. Unknown codes select the default shape.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => GroupFormat::ByYearList,
            2 => GroupFormat::RecordList,
            _ => GroupFormat::ByBucketMap,
        }
    }

    /// The numeric code of this format.
    pub fn code(self) -> u8 {
        match self {
            GroupFormat::ByBucketMap => 0,
            GroupFormat::ByYearList => 1,
            GroupFormat::RecordList => 2,
        }
    }
}

impl std::fmt::Display for GroupFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupFormat::ByBucketMap => write!(f, "bucket_map"),
            GroupFormat::ByYearList => write!(f, "year_list"),
            GroupFormat::RecordList => write!(f, "records"),
        }
    }
}

impl FromStr for GroupFormat {
    type Err = Infallible;

    /// Accepts format names or numeric codes; anything else is the default.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let format = match s.trim().to_lowercase().as_str() {
            "bucket_map" => GroupFormat::ByBucketMap,
            "year_list" => GroupFormat::ByYearList,
            "records" => GroupFormat::RecordList,
            other => other
                .parse::<i64>()
                .map(GroupFormat::from_code)
                .unwrap_or_default(),
        };
        Ok(format)
    }
}

/// Output shape for fortnight grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FortnightFormat {
    /// Two halves per month: 1st-15th and 16th-end (code 0)
    #[default]
    MonthRelative,
    /// 15-day slices counted from January 1st (code 1)
    YearRelative,
}

impl FortnightFormat {
    /// Resolve a numeric format code. Unknown codes select the default shape.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => FortnightFormat::YearRelative,
            _ => FortnightFormat::MonthRelative,
        }
    }

    /// The numeric code of this format.
    pub fn code(self) -> u8 {
        match self {
            FortnightFormat::MonthRelative => 0,
            FortnightFormat::YearRelative => 1,
        }
    }
}

impl std::fmt::Display for FortnightFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FortnightFormat::MonthRelative => write!(f, "month_relative"),
            FortnightFormat::YearRelative => write!(f, "year_relative"),
        }
    }
}

impl FromStr for FortnightFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let format = match s.trim().to_lowercase().as_str() {
            "month_relative" => FortnightFormat::MonthRelative,
            "year_relative" => FortnightFormat::YearRelative,
            other => other
                .parse::<i64>()
                .map(FortnightFormat::from_code)
                .unwrap_or_default(),
        };
        Ok(format)
    }
}

/// An ISO week filed under its grouping year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WeekKey {
    /// Grouping year (the ISO week-numbering year).
    pub year: i32,
    /// ISO week number, 1..=53.
    pub week: u32,
}

impl WeekKey {
    /// Monday of this week.
    pub fn first_day(&self) -> Result<NaiveDate> {
        first_day_of_week(self.week, self.year)
    }

    /// Sunday of this week.
    pub fn last_day(&self) -> Result<NaiveDate> {
        last_day_of_week(self.week, self.year)
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    /// Month, 1..=12.
    pub month: u32,
}

impl MonthKey {
    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following month, rolling December over into January.
    ///
    /// `None` once the year counter would overflow.
    pub fn succ(self) -> Option<Self> {
        if self.month >= 12 {
            Some(MonthKey {
                year: self.year.checked_add(1)?,
                month: 1,
            })
        } else {
            Some(MonthKey {
                year: self.year,
                month: self.month + 1,
            })
        }
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        first_day_of_month(self.month, self.year)
    }

    pub fn last_day(&self) -> Result<NaiveDate> {
        last_day_of_month(self.month, self.year)
    }
}

/// Which half of a month a month-relative fortnight covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FortnightHalf {
    /// Days 1-15.
    First,
    /// Day 16 to the end of the month.
    Second,
}

impl FortnightHalf {
    /// 1 for the first half, 2 for the second.
    pub fn index(self) -> u32 {
        match self {
            FortnightHalf::First => 1,
            FortnightHalf::Second => 2,
        }
    }
}

/// A month-relative fortnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthFortnightKey {
    pub year: i32,
    pub month: u32,
    pub half: FortnightHalf,
}

impl MonthFortnightKey {
    /// The following fortnight: second half of the same month, or the first
    /// half of the next month.
    pub fn succ(self) -> Option<Self> {
        match self.half {
            FortnightHalf::First => Some(MonthFortnightKey {
                half: FortnightHalf::Second,
                ..self
            }),
            FortnightHalf::Second => {
                let next = MonthKey {
                    year: self.year,
                    month: self.month,
                }
                .succ()?;
                Some(MonthFortnightKey {
                    year: next.year,
                    month: next.month,
                    half: FortnightHalf::First,
                })
            }
        }
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        match self.half {
            FortnightHalf::First => first_day_of_month(self.month, self.year),
            FortnightHalf::Second => day_of_month(16, self.month, self.year),
        }
    }

    pub fn last_day(&self) -> Result<NaiveDate> {
        match self.half {
            FortnightHalf::First => day_of_month(15, self.month, self.year),
            FortnightHalf::Second => last_day_of_month(self.month, self.year),
        }
    }
}

/// A year-relative fortnight: the `index`-th 15-day slice of `year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearFortnightKey {
    pub year: i32,
    /// Slice index, 0..=24.
    pub index: u32,
}

impl YearFortnightKey {
    /// The slice containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        YearFortnightKey {
            year: date.year(),
            index: date_fortnight(&date),
        }
    }

    /// The following slice; slice 24 is followed by slice 0 of the next year.
    pub fn succ(self) -> Option<Self> {
        if self.index >= LAST_YEAR_FORTNIGHT {
            Some(YearFortnightKey {
                year: self.year.checked_add(1)?,
                index: 0,
            })
        } else {
            Some(YearFortnightKey {
                year: self.year,
                index: self.index + 1,
            })
        }
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        self.check_index()?;
        day_of_year(self.index * FORTNIGHT_DAYS + 1, self.year)
    }

    /// The slice's last day; slice 24 always ends on December 31st.
    pub fn last_day(&self) -> Result<NaiveDate> {
        self.check_index()?;
        let ordinal = if self.index == LAST_YEAR_FORTNIGHT {
            days_in_year(self.year)
        } else {
            (self.index + 1) * FORTNIGHT_DAYS
        };
        day_of_year(ordinal, self.year)
    }

    fn check_index(&self) -> Result<()> {
        if self.index > LAST_YEAR_FORTNIGHT {
            return Err(DateBucketError::InvalidCalendarInput(format!(
                "fortnight {} is not in 0..={LAST_YEAR_FORTNIGHT}",
                self.index
            )));
        }
        Ok(())
    }
}

/// The sub-unit a [`BucketRecord`] describes. Serializes as `"week": n`,
/// `"fortnight": n` or `"month": n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketUnit {
    Week(u32),
    Fortnight(u32),
    Month(u32),
}

impl BucketUnit {
    pub fn value(self) -> u32 {
        match self {
            BucketUnit::Week(n) | BucketUnit::Fortnight(n) | BucketUnit::Month(n) => n,
        }
    }
}

/// One bucket with its bounding days and an empty slot for caller data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketRecord {
    pub year: i32,
    #[serde(flatten)]
    pub unit: BucketUnit,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    /// Always `None` when produced by this library.
    pub data: Option<Value>,
}

/// First and last day of one month-relative fortnight plus a data slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FortnightSlot {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub data: Option<Value>,
}

impl FortnightSlot {
    pub fn of(key: &MonthFortnightKey) -> Result<Self> {
        Ok(FortnightSlot {
            first_day: key.first_day()?,
            last_day: key.last_day()?,
            data: None,
        })
    }
}

/// Both halves of a month, serialized under the keys `"1"` and `"2"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FortnightPair {
    #[serde(rename = "1")]
    pub first: FortnightSlot,
    #[serde(rename = "2")]
    pub second: FortnightSlot,
}

/// One month split into its two fortnights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthFortnights {
    pub year: i32,
    pub month: u32,
    pub fortnight: FortnightPair,
}

/// A grouped week or month partition in one of the [`GroupFormat`] shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Grouped {
    /// year -> unit -> placeholder
    BucketMap(BTreeMap<i32, BTreeMap<u32, Option<Value>>>),
    /// year -> units in walk order
    YearList(BTreeMap<i32, Vec<u32>>),
    /// Records in walk order
    Records(Vec<BucketRecord>),
}

impl Grouped {
    /// An empty result in the given shape.
    pub fn empty(format: GroupFormat) -> Self {
        match format {
            GroupFormat::ByBucketMap => Grouped::BucketMap(BTreeMap::new()),
            GroupFormat::ByYearList => Grouped::YearList(BTreeMap::new()),
            GroupFormat::RecordList => Grouped::Records(Vec::new()),
        }
    }

    /// The shape this result was assembled in.
    pub fn format(&self) -> GroupFormat {
        match self {
            Grouped::BucketMap(_) => GroupFormat::ByBucketMap,
            Grouped::YearList(_) => GroupFormat::ByYearList,
            Grouped::Records(_) => GroupFormat::RecordList,
        }
    }

    /// Total number of buckets across all years.
    pub fn bucket_count(&self) -> usize {
        match self {
            Grouped::BucketMap(map) => map.values().map(BTreeMap::len).sum(),
            Grouped::YearList(map) => map.values().map(Vec::len).sum(),
            Grouped::Records(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bucket_count() == 0
    }
}

/// A grouped fortnight partition in one of the [`FortnightFormat`] shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FortnightGrouping {
    MonthRelative(Vec<MonthFortnights>),
    YearRelative(Vec<BucketRecord>),
}

impl FortnightGrouping {
    pub fn empty(format: FortnightFormat) -> Self {
        match format {
            FortnightFormat::MonthRelative => FortnightGrouping::MonthRelative(Vec::new()),
            FortnightFormat::YearRelative => FortnightGrouping::YearRelative(Vec::new()),
        }
    }

    /// Number of fortnights: two per month in the month-relative shape.
    pub fn bucket_count(&self) -> usize {
        match self {
            FortnightGrouping::MonthRelative(months) => months.len() * 2,
            FortnightGrouping::YearRelative(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bucket_count() == 0
    }
}

/// An inclusive `[start, end]` date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Validate and build a range.
    ///
    /// # Errors
    ///
    /// [`DateBucketError::InvalidRange`] when `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(DateBucketError::InvalidRange { start, end });
        }
        Ok(DateRange { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` lies inside the range (both ends inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the range, counting both ends.
    pub fn len_days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn group_format_default_is_bucket_map() {
        assert_eq!(GroupFormat::default(), GroupFormat::ByBucketMap);
        assert_eq!(FortnightFormat::default(), FortnightFormat::MonthRelative);
    }

    #[test]
    fn group_format_codes() {
        assert_eq!(GroupFormat::from_code(0), GroupFormat::ByBucketMap);
        assert_eq!(GroupFormat::from_code(1), GroupFormat::ByYearList);
        assert_eq!(GroupFormat::from_code(2), GroupFormat::RecordList);
        assert_eq!(GroupFormat::from_code(99), GroupFormat::ByBucketMap);
        assert_eq!(GroupFormat::from_code(-1), GroupFormat::ByBucketMap);
        assert_eq!(GroupFormat::RecordList.code(), 2);
    }

    #[test]
    fn fortnight_format_codes() {
        assert_eq!(FortnightFormat::from_code(1), FortnightFormat::YearRelative);
        assert_eq!(FortnightFormat::from_code(2), FortnightFormat::MonthRelative);
        assert_eq!(FortnightFormat::YearRelative.code(), 1);
    }

    #[test]
    fn format_from_str_falls_back_to_default() {
        assert_eq!("records".parse::<GroupFormat>().unwrap(), GroupFormat::RecordList);
        assert_eq!("1".parse::<GroupFormat>().unwrap(), GroupFormat::ByYearList);
        assert_eq!("weird".parse::<GroupFormat>().unwrap(), GroupFormat::ByBucketMap);
        assert_eq!(
            "YEAR_RELATIVE".parse::<FortnightFormat>().unwrap(),
            FortnightFormat::YearRelative
        );
        assert_eq!(
            "7".parse::<FortnightFormat>().unwrap(),
            FortnightFormat::MonthRelative
        );
    }

    #[test]
    fn format_display_round_trips_through_from_str() {
        for format in [
            GroupFormat::ByBucketMap,
            GroupFormat::ByYearList,
            GroupFormat::RecordList,
        ] {
            assert_eq!(format.to_string().parse::<GroupFormat>().unwrap(), format);
        }
    }

    #[test]
    fn month_key_rolls_over_december() {
        let dec = MonthKey {
            year: 2023,
            month: 12,
        };
        let next = dec.succ().unwrap();
        assert_eq!(
            next,
            MonthKey {
                year: 2024,
                month: 1
            }
        );
        assert!(dec < next);
    }

    #[test]
    fn successors_stop_at_last_year() {
        let month = MonthKey {
            year: i32::MAX,
            month: 12,
        };
        assert_eq!(month.succ(), None);

        let half = MonthFortnightKey {
            year: i32::MAX,
            month: 12,
            half: FortnightHalf::Second,
        };
        assert_eq!(half.succ(), None);

        let slice = YearFortnightKey {
            year: i32::MAX,
            index: LAST_YEAR_FORTNIGHT,
        };
        assert_eq!(slice.succ(), None);
    }

    #[test]
    fn month_fortnight_key_walks_halves() {
        let key = MonthFortnightKey {
            year: 2024,
            month: 12,
            half: FortnightHalf::First,
        };
        let second = key.succ().unwrap();
        assert_eq!(second.half, FortnightHalf::Second);
        assert_eq!(second.month, 12);
        let next = second.succ().unwrap();
        assert_eq!((next.year, next.month, next.half), (2025, 1, FortnightHalf::First));
        assert!(key < second && second < next);
    }

    #[test]
    fn month_fortnight_bounds() {
        let feb = MonthFortnightKey {
            year: 2024,
            month: 2,
            half: FortnightHalf::Second,
        };
        assert_eq!(feb.first_day().unwrap(), date(2024, 2, 16));
        assert_eq!(feb.last_day().unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn year_fortnight_bounds() {
        let first = YearFortnightKey {
            year: 2024,
            index: 0,
        };
        assert_eq!(first.first_day().unwrap(), date(2024, 1, 1));
        assert_eq!(first.last_day().unwrap(), date(2024, 1, 15));

        let last = YearFortnightKey {
            year: 2023,
            index: 24,
        };
        assert_eq!(last.first_day().unwrap(), date(2023, 12, 27));
        assert_eq!(last.last_day().unwrap(), date(2023, 12, 31));

        let leap_last = YearFortnightKey {
            year: 2024,
            index: 24,
        };
        assert_eq!(leap_last.first_day().unwrap(), date(2024, 12, 26));
        assert_eq!(leap_last.last_day().unwrap(), date(2024, 12, 31));
    }

    #[test]
    fn year_fortnight_rollover_starts_at_zero() {
        let key = YearFortnightKey {
            year: 2023,
            index: 24,
        };
        assert_eq!(
            key.succ(),
            Some(YearFortnightKey {
                year: 2024,
                index: 0
            })
        );
    }

    #[test]
    fn year_fortnight_index_out_of_range() {
        let key = YearFortnightKey {
            year: 2023,
            index: 25,
        };
        assert!(matches!(
            key.first_day(),
            Err(DateBucketError::InvalidCalendarInput(_))
        ));
    }

    #[test]
    fn bucket_record_serializes_unit_by_name() {
        let record = BucketRecord {
            year: 2024,
            unit: BucketUnit::Week(9),
            first_day: date(2024, 2, 26),
            last_day: date(2024, 3, 3),
            data: None,
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "year": 2024,
                "week": 9,
                "first_day": "2024-02-26",
                "last_day": "2024-03-03",
                "data": null
            })
        );
    }

    #[test]
    fn grouped_serializes_untagged() {
        let mut map = BTreeMap::new();
        map.insert(2024, vec![1, 2]);
        let grouped = Grouped::YearList(map);
        assert_eq!(serde_json::to_value(&grouped).unwrap(), json!({"2024": [1, 2]}));
        assert_eq!(grouped.bucket_count(), 2);
        assert_eq!(grouped.format(), GroupFormat::ByYearList);
    }

    #[test]
    fn empty_shapes() {
        assert!(Grouped::empty(GroupFormat::RecordList).is_empty());
        assert_eq!(
            Grouped::empty(GroupFormat::ByBucketMap).format(),
            GroupFormat::ByBucketMap
        );
        assert!(FortnightGrouping::empty(FortnightFormat::YearRelative).is_empty());
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        let result = DateRange::new(date(2024, 3, 1), date(2024, 2, 1));
        assert!(matches!(result, Err(DateBucketError::InvalidRange { .. })));

        let range = DateRange::new(date(2024, 2, 1), date(2024, 3, 1)).unwrap();
        assert_eq!(range.len_days(), 30);
        assert!(range.contains(date(2024, 2, 29)));
        assert!(!range.contains(date(2024, 3, 2)));
    }
}

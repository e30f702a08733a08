//! Bucket assembly.
//!
//! The grouping entry points derive start and end keys for a date range,
//! drive the matching walker and fold the keys into the requested output
//! shape. A range whose end lies before its start produces an empty result
//! in the requested shape.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::boundary::week_key;
use crate::error::Result;
use crate::models::{
    BucketRecord, BucketUnit, DateRange, FortnightFormat, FortnightGrouping, FortnightPair,
    FortnightSlot, GroupFormat, Grouped, MonthFortnights, MonthKey, WeekKey, YearFortnightKey,
};
use crate::walk::{MonthFortnightWalk, MonthWalk, WeekWalk, YearFortnightWalk};

/// A walker key that can be filed into a [`Grouped`] result.
trait Bucket {
    fn year(&self) -> i32;
    fn unit(&self) -> BucketUnit;
    fn first_day(&self) -> Result<NaiveDate>;
    fn last_day(&self) -> Result<NaiveDate>;

    fn record(&self) -> Result<BucketRecord> {
        Ok(BucketRecord {
            year: self.year(),
            unit: self.unit(),
            first_day: self.first_day()?,
            last_day: self.last_day()?,
            data: None,
        })
    }
}

impl Bucket for WeekKey {
    fn year(&self) -> i32 {
        self.year
    }

    fn unit(&self) -> BucketUnit {
        BucketUnit::Week(self.week)
    }

    fn first_day(&self) -> Result<NaiveDate> {
        WeekKey::first_day(self)
    }

    fn last_day(&self) -> Result<NaiveDate> {
        WeekKey::last_day(self)
    }
}

impl Bucket for MonthKey {
    fn year(&self) -> i32 {
        self.year
    }

    fn unit(&self) -> BucketUnit {
        BucketUnit::Month(self.month)
    }

    fn first_day(&self) -> Result<NaiveDate> {
        MonthKey::first_day(self)
    }

    fn last_day(&self) -> Result<NaiveDate> {
        MonthKey::last_day(self)
    }
}

impl Bucket for YearFortnightKey {
    fn year(&self) -> i32 {
        self.year
    }

    fn unit(&self) -> BucketUnit {
        BucketUnit::Fortnight(self.index)
    }

    fn first_day(&self) -> Result<NaiveDate> {
        YearFortnightKey::first_day(self)
    }

    fn last_day(&self) -> Result<NaiveDate> {
        YearFortnightKey::last_day(self)
    }
}

fn assemble<K, I>(keys: I, format: GroupFormat) -> Result<Grouped>
where
    K: Bucket,
    I: IntoIterator<Item = K>,
{
    let grouped = match format {
        GroupFormat::ByBucketMap => {
            let mut map: BTreeMap<i32, BTreeMap<u32, _>> = BTreeMap::new();
            for key in keys {
                map.entry(key.year())
                    .or_default()
                    .insert(key.unit().value(), None);
            }
            Grouped::BucketMap(map)
        }
        GroupFormat::ByYearList => {
            let mut map: BTreeMap<i32, Vec<u32>> = BTreeMap::new();
            for key in keys {
                map.entry(key.year()).or_default().push(key.unit().value());
            }
            Grouped::YearList(map)
        }
        GroupFormat::RecordList => Grouped::Records(
            keys.into_iter()
                .map(|key| key.record())
                .collect::<Result<Vec<_>>>()?,
        ),
    };
    Ok(grouped)
}

/// ISO weeks touched by `[start, end]`, grouped by year.
///
/// Weeks are filed under their ISO week-numbering year, so a week 1 that
/// starts in December is grouped under the following year.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use datebucket_core::{GroupFormat, Grouped, weeks_between_dates_by_year};
///
/// let start = NaiveDate::from_ymd_opt(2020, 12, 21).unwrap();
/// let end = NaiveDate::from_ymd_opt(2021, 1, 10).unwrap();
/// let grouped = weeks_between_dates_by_year(start, end, GroupFormat::ByYearList).unwrap();
///
/// match grouped {
///     Grouped::YearList(years) => {
///         assert_eq!(years[&2020], vec![52, 53]);
///         assert_eq!(years[&2021], vec![1]);
///     }
///     _ => unreachable!(),
/// }
/// ```
pub fn weeks_between_dates_by_year(
    start: NaiveDate,
    end: NaiveDate,
    format: GroupFormat,
) -> Result<Grouped> {
    if end < start {
        debug!(%start, %end, "reversed range, no weeks");
        return Ok(Grouped::empty(format));
    }

    let first = week_key(start);
    let last = week_key(end);
    debug!(?first, ?last, %format, "grouping weeks");

    let grouped = assemble(WeekWalk::new(first, last)?, format)?;
    debug!(buckets = grouped.bucket_count(), "weeks grouped");
    Ok(grouped)
}

/// Calendar months touched by `[start, end]`, grouped by year.
///
/// ```
/// use chrono::NaiveDate;
/// use datebucket_core::{GroupFormat, months_between_dates_by_year};
///
/// let start = NaiveDate::from_ymd_opt(2023, 11, 15).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
/// let grouped = months_between_dates_by_year(start, end, GroupFormat::ByYearList).unwrap();
/// assert_eq!(
///     serde_json::to_string(&grouped).unwrap(),
///     r#"{"2023":[11,12],"2024":[1,2]}"#
/// );
/// ```
pub fn months_between_dates_by_year(
    start: NaiveDate,
    end: NaiveDate,
    format: GroupFormat,
) -> Result<Grouped> {
    if end < start {
        debug!(%start, %end, "reversed range, no months");
        return Ok(Grouped::empty(format));
    }

    let first = MonthKey::of(start);
    let last = MonthKey::of(end);
    debug!(?first, ?last, %format, "grouping months");

    let grouped = assemble(MonthWalk::new(first, last), format)?;
    debug!(buckets = grouped.bucket_count(), "months grouped");
    Ok(grouped)
}

/// Fortnights touched by `[start, end]`.
///
/// [`FortnightFormat::MonthRelative`] lists every month once with both of
/// its halves; [`FortnightFormat::YearRelative`] lists 15-day slices of the
/// year as records.
pub fn fortnights_between_dates_by_year(
    start: NaiveDate,
    end: NaiveDate,
    format: FortnightFormat,
) -> Result<FortnightGrouping> {
    if end < start {
        debug!(%start, %end, "reversed range, no fortnights");
        return Ok(FortnightGrouping::empty(format));
    }

    let grouping = match format {
        FortnightFormat::MonthRelative => month_fortnights(start, end)?,
        FortnightFormat::YearRelative => year_fortnights(start, end)?,
    };
    debug!(buckets = grouping.bucket_count(), %format, "fortnights grouped");
    Ok(grouping)
}

fn month_fortnights(start: NaiveDate, end: NaiveDate) -> Result<FortnightGrouping> {
    let first = MonthKey::of(start);
    let last = MonthKey::of(end);
    debug!(?first, ?last, "grouping month fortnights");

    let mut walk = MonthFortnightWalk::new(first, last);
    let mut months = Vec::new();
    // The walk always emits both halves of a month back to back.
    while let (Some(first_half), Some(second_half)) = (walk.next(), walk.next()) {
        months.push(MonthFortnights {
            year: first_half.year,
            month: first_half.month,
            fortnight: FortnightPair {
                first: FortnightSlot::of(&first_half)?,
                second: FortnightSlot::of(&second_half)?,
            },
        });
    }
    Ok(FortnightGrouping::MonthRelative(months))
}

fn year_fortnights(start: NaiveDate, end: NaiveDate) -> Result<FortnightGrouping> {
    let first = YearFortnightKey::of(start);
    let last = YearFortnightKey::of(end);
    debug!(?first, ?last, "grouping year fortnights");

    let records = YearFortnightWalk::new(first, last)
        .map(|key| key.record())
        .collect::<Result<Vec<_>>>()?;
    Ok(FortnightGrouping::YearRelative(records))
}

impl DateRange {
    /// See [`weeks_between_dates_by_year`].
    pub fn weeks(&self, format: GroupFormat) -> Result<Grouped> {
        weeks_between_dates_by_year(self.start(), self.end(), format)
    }

    /// See [`fortnights_between_dates_by_year`].
    pub fn fortnights(&self, format: FortnightFormat) -> Result<FortnightGrouping> {
        fortnights_between_dates_by_year(self.start(), self.end(), format)
    }

    /// See [`months_between_dates_by_year`].
    pub fn months(&self, format: GroupFormat) -> Result<Grouped> {
        months_between_dates_by_year(self.start(), self.end(), format)
    }
}

//! Range walkers.
//!
//! Each walker is a finite iterator that produces a fresh value per step
//! and can be restarted by cloning it before consumption. Keys come out in
//! strictly increasing order; a walker whose start lies past its end yields
//! nothing.

use chrono::NaiveDate;

use crate::boundary::week_key;
use crate::calendar::{
    Instant, add_days, first_day_of_week, instant_of, last_day_of_week, start_of_day,
};
use crate::error::Result;
use crate::models::{FortnightHalf, MonthFortnightKey, MonthKey, WeekKey, YearFortnightKey};

/// Calendar days from `start` to `end`, both inclusive.
#[derive(Debug, Clone)]
pub struct DayWalk {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DayWalk {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DayWalk {
            next: Some(start),
            end,
        }
    }
}

impl Iterator for DayWalk {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|day| *day <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }
}

/// Instants stepping a fixed number of whole days.
#[derive(Debug, Clone)]
pub struct InstantWalk {
    next: Option<Instant>,
    end: Instant,
    step_days: i64,
    inclusive: bool,
}

impl InstantWalk {
    /// One step per day while the current instant is `<= end`.
    pub fn daily(start: Instant, end: Instant) -> Self {
        InstantWalk {
            next: Some(start),
            end,
            step_days: 1,
            inclusive: true,
        }
    }

    /// One step per week while the current instant is `< end`.
    pub fn weekly(start: Instant, end: Instant) -> Self {
        InstantWalk {
            next: Some(start),
            end,
            step_days: 7,
            inclusive: false,
        }
    }
}

impl Iterator for InstantWalk {
    type Item = Instant;

    fn next(&mut self) -> Option<Instant> {
        let current = self.next?;
        let in_range = if self.inclusive {
            current <= self.end
        } else {
            current < self.end
        };
        if !in_range {
            self.next = None;
            return None;
        }
        self.next = add_days(current, self.step_days).ok();
        Some(current)
    }
}

/// ISO weeks from the Monday of `start` up to the Sunday of `end`, each
/// filed under its corrected grouping year.
#[derive(Debug, Clone)]
pub struct WeekWalk {
    instants: InstantWalk,
}

impl WeekWalk {
    /// # Errors
    ///
    /// Fails when either key names a week that does not exist or that lies
    /// outside the representable calendar.
    pub fn new(start: WeekKey, end: WeekKey) -> Result<Self> {
        let from = instant_of(first_day_of_week(start.week, start.year)?);
        let to = instant_of(last_day_of_week(end.week, end.year)?);
        Ok(WeekWalk {
            instants: InstantWalk::weekly(from, to),
        })
    }
}

impl Iterator for WeekWalk {
    type Item = WeekKey;

    fn next(&mut self) -> Option<WeekKey> {
        self.instants
            .next()
            .map(|instant| week_key(instant.date_naive()))
    }
}

/// Months from `start` to `end`, both inclusive.
#[derive(Debug, Clone)]
pub struct MonthWalk {
    next: Option<MonthKey>,
    end: MonthKey,
}

impl MonthWalk {
    pub fn new(start: MonthKey, end: MonthKey) -> Self {
        MonthWalk {
            next: Some(start),
            end,
        }
    }
}

impl Iterator for MonthWalk {
    type Item = MonthKey;

    fn next(&mut self) -> Option<MonthKey> {
        let current = self.next.filter(|key| *key <= self.end)?;
        self.next = current.succ();
        Some(current)
    }
}

/// Month-relative fortnights covering every month from `start` to `end`:
/// two keys per month, first half then second half.
#[derive(Debug, Clone)]
pub struct MonthFortnightWalk {
    next: Option<MonthFortnightKey>,
    end: MonthFortnightKey,
}

impl MonthFortnightWalk {
    pub fn new(start: MonthKey, end: MonthKey) -> Self {
        MonthFortnightWalk {
            next: Some(MonthFortnightKey {
                year: start.year,
                month: start.month,
                half: FortnightHalf::First,
            }),
            end: MonthFortnightKey {
                year: end.year,
                month: end.month,
                half: FortnightHalf::Second,
            },
        }
    }
}

impl Iterator for MonthFortnightWalk {
    type Item = MonthFortnightKey;

    fn next(&mut self) -> Option<MonthFortnightKey> {
        let current = self.next.filter(|key| *key <= self.end)?;
        self.next = current.succ();
        Some(current)
    }
}

/// Year-relative fortnights from `start` to `end`, both inclusive.
#[derive(Debug, Clone)]
pub struct YearFortnightWalk {
    next: Option<YearFortnightKey>,
    end: YearFortnightKey,
}

impl YearFortnightWalk {
    pub fn new(start: YearFortnightKey, end: YearFortnightKey) -> Self {
        YearFortnightWalk {
            next: Some(start),
            end,
        }
    }
}

impl Iterator for YearFortnightWalk {
    type Item = YearFortnightKey;

    fn next(&mut self) -> Option<YearFortnightKey> {
        let current = self.next.filter(|key| *key <= self.end)?;
        self.next = current.succ();
        Some(current)
    }
}

/// Every calendar day in `[start, end]`.
///
/// ```
/// use chrono::NaiveDate;
/// use datebucket_core::walk::days_between_dates;
///
/// let start = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert_eq!(days_between_dates(start, end).len(), 4);
/// ```
pub fn days_between_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    DayWalk::new(start, end).collect()
}

/// Midnight instants of every day from the day of `start` to the day of
/// `end`, both inclusive.
pub fn day_instants_between(start: Instant, end: Instant) -> Vec<Instant> {
    InstantWalk::daily(start_of_day(start), start_of_day(end)).collect()
}

//! # datebucket-core
//!
//! Calendar arithmetic and date-range partitioning for Rust.
//!
//! This library splits the range between two calendar dates into buckets
//! (days, ISO weeks, fortnights, months), groups them by year, and returns
//! them in one of several output shapes with empty data slots for the caller
//! to fill in.
//!
//! ## Features
//!
//! - **ISO weeks**: Weeks that straddle New Year are filed under the year
//!   they belong to (week 1 starting in December goes to the next year).
//! - **Three shapes**: Year-to-unit maps with placeholders, year-to-unit
//!   lists, or flat records with first/last day and a `data` slot.
//! - **Two fortnight flavours**: Month halves (1st-15th, 16th-end) or
//!   15-day slices of the year.
//! - **Pure**: No global state, no mutation of inputs, no I/O.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use datebucket_core::prelude::*;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
//! let range = DateRange::new(start, end).unwrap();
//!
//! let weeks = range.weeks(GroupFormat::RecordList).unwrap();
//! println!("{}", serde_json::to_string_pretty(&weeks).unwrap());
//! assert_eq!(weeks.bucket_count(), 13);
//! ```

pub mod boundary;
pub mod calendar;
pub mod error;
pub mod group;
pub mod models;
pub mod walk;

// Re-export commonly used types at the crate root
pub use error::{DateBucketError, Result};
pub use group::{
    fortnights_between_dates_by_year, months_between_dates_by_year, weeks_between_dates_by_year,
};
pub use models::{
    BucketRecord, BucketUnit, DateRange, FortnightFormat, FortnightGrouping, FortnightHalf,
    FortnightPair, FortnightSlot, GroupFormat, Grouped, MonthFortnightKey, MonthFortnights,
    MonthKey, WeekKey, YearFortnightKey,
};

/// Prelude module for convenient imports.
///
/// ```
/// use datebucket_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::boundary::{grouping_year, week_key};
    pub use crate::calendar::*;
    pub use crate::error::{DateBucketError, Result};
    pub use crate::group::{
        fortnights_between_dates_by_year, months_between_dates_by_year,
        weeks_between_dates_by_year,
    };
    pub use crate::models::*;
    pub use crate::walk::{days_between_dates, day_instants_between};
}

//! Error types for datebucket-core.
//!
//! Every fallible operation in the library reports one of the variants of
//! [`DateBucketError`]. None of them are transient: an error always means the
//! caller passed something that does not name a real calendar value.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for datebucket operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateBucketError {
    /// A (day, month, year), (week, year) or (ordinal, year) combination
    /// that does not exist in the proleptic Gregorian calendar.
    #[error("Invalid calendar input: {0}")]
    InvalidCalendarInput(String),

    /// The end of a range lies before its start.
    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange {
        /// Requested range start.
        start: NaiveDate,
        /// Requested range end.
        end: NaiveDate,
    },

    /// Arithmetic left the representable date range.
    #[error("Out of range: {0}")]
    OutOfRange(String),
}

/// Result type alias for datebucket operations.
pub type Result<T> = std::result::Result<T, DateBucketError>;

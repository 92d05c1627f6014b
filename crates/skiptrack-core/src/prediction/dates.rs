//! Calendar-day parsing and the cycle-length differ.
//!
//! Every date that enters the engine is reduced to a [`NaiveDate`] first, so
//! the differ only ever subtracts whole calendar days.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::error::ValidationError;

/// Parse a caller-supplied date.
///
/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp. Timestamps are
/// moved to UTC and their time of day is dropped, so stored timestamps land on
/// the same calendar day as their plain-date counterparts.
pub fn parse_day(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc).date_naive());
    }

    Err(ValidationError::InvalidDate {
        input: input.to_string(),
    })
}

/// Parse a batch of dates, failing on the first malformed one.
pub fn parse_days<I, S>(inputs: I) -> Result<Vec<NaiveDate>, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs.into_iter().map(|s| parse_day(s.as_ref())).collect()
}

/// Whole-day gaps between consecutive period start dates.
///
/// The input may be in any order; it is sorted ascending before differencing.
/// `n` dates yield `n - 1` gaps in chronological order, and fewer than two
/// dates yield an empty vector. Duplicate dates are legal and produce a gap of
/// zero.
pub fn cycle_lengths_from_start_dates(start_dates: &[NaiveDate]) -> Vec<i64> {
    if start_dates.len() < 2 {
        return Vec::new();
    }

    let mut sorted = start_dates.to_vec();
    sorted.sort_unstable();

    sorted
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days())
        .collect()
}

/// Shift `date` by a possibly fractional number of days, rounded to the
/// nearest whole day. Returns `None` when the result leaves chrono's range.
pub fn add_days(date: NaiveDate, days: f64) -> Option<NaiveDate> {
    let whole = days.round();
    if !whole.is_finite() {
        return None;
    }
    let delta = TimeDelta::try_days(whole as i64)?;
    date.checked_add_signed(delta)
}

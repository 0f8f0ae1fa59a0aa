//! The reporting window shared by every collector.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("end {end} is before start {start}")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("window of {0} days is out of range")]
    TooLong(u32),
}

/// A `[start, end]` window in UTC.
///
/// Whether `end` itself is inside the window is a per-platform decision;
/// [`DateRange::contains`] is the inclusive check and
/// [`DateRange::contains_half_open`] the exclusive one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`RangeError::Inverted`] if `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window starting at midnight UTC on `start_date` and spanning `days` days.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::TooLong`] if the end would overflow the calendar.
    pub fn from_start_date(start_date: NaiveDate, days: u32) -> Result<Self, RangeError> {
        let start = start_date.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = start
            .checked_add_signed(Duration::days(i64::from(days)))
            .ok_or(RangeError::TooLong(days))?;
        Ok(Self { start, end })
    }

    /// Window ending at `now` and reaching back `days` days.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::TooLong`] if the start would underflow the calendar.
    pub fn ending_at(now: DateTime<Utc>, days: u32) -> Result<Self, RangeError> {
        let start = now
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or(RangeError::TooLong(days))?;
        Ok(Self { start, end: now })
    }

    /// The last `days` days up to the current instant.
    ///
    /// # Errors
    ///
    /// See [`DateRange::ending_at`].
    pub fn last_days(days: u32) -> Result<Self, RangeError> {
        Self::ending_at(Utc::now(), days)
    }

    /// `start <= t <= end`.
    #[must_use]
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }

    /// `start <= t < end`.
    #[must_use]
    pub fn contains_half_open(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    /// RFC 3339 with a `Z` suffix and whole seconds, the form the X and
    /// `YouTube` APIs accept for their window parameters.
    #[must_use]
    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    }

    #[must_use]
    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    }
}

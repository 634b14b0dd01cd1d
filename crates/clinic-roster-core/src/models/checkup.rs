//! Checkup appointments.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::{ModelError, ModelResult, DATE_FORMAT};

/// Display/storage format for checkup times.
pub const TIME_FORMAT: &str = "%H:%M";

/// Input format for checkup times (`HHmm`).
pub const INPUT_TIME_FORMAT: &str = "%H%M";

/// Minimum gap between two checkups of the same patient, in seconds.
pub const MIN_SEPARATION_SECS: i64 = 30 * 60;

/// Clinic opening time, seconds from midnight (09:00).
const OPENING_SECS: u32 = 9 * 3600;

/// Clinic closing time, seconds from midnight (17:00).
const CLOSING_SECS: u32 = 17 * 3600;

/// A scheduled checkup at a local date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Checkup(NaiveDateTime);

impl Checkup {
    /// Validate a new checkup against business hours and `now`.
    pub fn schedule(date: NaiveDate, time: NaiveTime, now: NaiveDateTime) -> ModelResult<Self> {
        let checkup = Self::at(date.and_time(time));
        if !checkup.is_within_business_hours() {
            return Err(ModelError::OutsideBusinessHours);
        }
        if checkup.0 < now {
            return Err(ModelError::PastDate);
        }
        Ok(checkup)
    }

    /// Parse raw `dd/MM/yyyy` and `HHmm` input, then validate.
    pub fn parse(date: &str, time: &str, now: NaiveDateTime) -> ModelResult<Self> {
        let (date, time) = Self::parse_input(date, time)?;
        Self::schedule(date, time, now)
    }

    /// Parse raw `dd/MM/yyyy` and `HHmm` input without validating the slot.
    pub fn parse_input(date: &str, time: &str) -> ModelResult<(NaiveDate, NaiveTime)> {
        Self::parse_parts(date, time, INPUT_TIME_FORMAT)
    }

    /// Parse stored `dd/MM/yyyy` and `HH:mm` strings without validation.
    pub fn from_stored(date: &str, time: &str) -> ModelResult<Self> {
        let (date, time) = Self::parse_parts(date, time, TIME_FORMAT)?;
        Ok(Self::at(date.and_time(time)))
    }

    /// Wrap a timestamp without validation, for lookups and stored data.
    pub fn at(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    fn parse_parts(date: &str, time: &str, time_format: &str) -> ModelResult<(NaiveDate, NaiveTime)> {
        let (date, time) = (date.trim(), time.trim());
        if date.is_empty() || time.is_empty() {
            return Err(ModelError::MissingDateOrTime);
        }
        let date =
            NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| ModelError::InvalidDate)?;
        let time =
            NaiveTime::parse_from_str(time, time_format).map_err(|_| ModelError::InvalidTime)?;
        Ok((date, time))
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    pub fn date_string(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }

    pub fn time_string(&self) -> String {
        self.0.format(TIME_FORMAT).to_string()
    }

    /// Both bounds inclusive.
    pub fn is_within_business_hours(&self) -> bool {
        let time = self.time();
        let secs = time.num_seconds_from_midnight();
        (OPENING_SECS..=CLOSING_SECS).contains(&secs)
            && !(secs == CLOSING_SECS && time.nanosecond() > 0)
    }

    /// Whether `other` is less than [`MIN_SEPARATION_SECS`] away.
    pub fn is_too_close_to(&self, other: &Checkup) -> bool {
        (self.0 - other.0).num_seconds().abs() < MIN_SEPARATION_SECS
    }
}

impl fmt::Display for Checkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date_string(), self.time_string())
    }
}

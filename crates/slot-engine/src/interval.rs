//! Immutable time range with a booked/free flag.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::error::{Result, ScheduleError};

/// A time range on the office's local wall clock.
///
/// `start < finish` always holds; fields are only readable through getters so
/// an interval cannot change once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    start: NaiveDateTime,
    finish: NaiveDateTime,
    booked: bool,
    duration_minutes: i64,
}

impl Interval {
    /// Build an interval, rejecting `finish <= start`.
    pub fn new(start: NaiveDateTime, finish: NaiveDateTime, booked: bool) -> Result<Self> {
        if finish <= start {
            return Err(ScheduleError::InvalidInterval { start, finish });
        }
        Ok(Self {
            start,
            finish,
            booked,
            duration_minutes: (finish - start).num_minutes(),
        })
    }

    pub fn booked(start: NaiveDateTime, finish: NaiveDateTime) -> Result<Self> {
        Self::new(start, finish, true)
    }

    pub fn free(start: NaiveDateTime, finish: NaiveDateTime) -> Result<Self> {
        Self::new(start, finish, false)
    }

    /// Build an interval of `minutes` length starting at `start`.
    ///
    /// Fails with `DurationOutOfRange` when the end cannot be represented and
    /// with `InvalidInterval` when `minutes` is not positive.
    pub fn from_duration(start: NaiveDateTime, minutes: i64, booked: bool) -> Result<Self> {
        let finish = Duration::try_minutes(minutes)
            .and_then(|delta| start.checked_add_signed(delta))
            .ok_or(ScheduleError::DurationOutOfRange { start, minutes })?;
        Self::new(start, finish, booked)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn finish(&self) -> NaiveDateTime {
        self.finish
    }

    pub fn is_booked(&self) -> bool {
        self.booked
    }

    /// Length in whole minutes, rounded down.
    pub fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }

    /// Strict overlap: intervals that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start.max(other.start) < self.finish.min(other.finish)
    }

    /// Whether `other` lies entirely within this interval.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.finish <= self.finish
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%H:%M"),
            self.finish.format("%H:%M")
        )
    }
}

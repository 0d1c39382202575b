//! Error types for slot-engine operations.

use chrono::{NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::interval::Interval;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Invalid interval: finish {finish} is not after start {start}")]
    InvalidInterval {
        start: NaiveDateTime,
        finish: NaiveDateTime,
    },

    #[error("Invalid interval: {minutes} minutes from {start} is out of range")]
    DurationOutOfRange { start: NaiveDateTime, minutes: i64 },

    #[error("Invalid office hours: closes at {closes} but opens at {opens}")]
    InvalidOfficeHours { opens: NaiveTime, closes: NaiveTime },

    #[error("{candidate} is outside office hours {opens_at} - {closes_at}")]
    OutsideOfficeHours {
        candidate: Interval,
        opens_at: NaiveDateTime,
        closes_at: NaiveDateTime,
    },

    #[error("{candidate} conflicts with booked appointment {booked}")]
    SlotConflict { candidate: Interval, booked: Interval },

    #[error("Slot of {minutes} minutes is shorter than one {step}-minute step")]
    SlotTooShort { minutes: i64, step: i64 },

    #[error("Unavailable choice: {0}")]
    UnavailableChoice(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

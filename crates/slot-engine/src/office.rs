//! Office operating hours.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{Result, ScheduleError};
use crate::interval::Interval;

/// Opening and closing wall-clock times, as the provider reports them for an
/// office. The same pair applies to every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyHours {
    pub opens: NaiveTime,
    pub closes: NaiveTime,
}

impl DailyHours {
    pub fn new(opens: NaiveTime, closes: NaiveTime) -> Self {
        Self { opens, closes }
    }

    /// Anchor these hours to a calendar date.
    pub fn on(&self, day: NaiveDate) -> Result<OfficeHours> {
        OfficeHours::new(day, self.opens, self.closes)
    }
}

/// The operating window of the office on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfficeHours {
    day: NaiveDate,
    window: Interval,
}

impl OfficeHours {
    /// # Errors
    /// Returns `ScheduleError::InvalidOfficeHours` unless `opens < closes`.
    pub fn new(day: NaiveDate, opens: NaiveTime, closes: NaiveTime) -> Result<Self> {
        if opens >= closes {
            return Err(ScheduleError::InvalidOfficeHours { opens, closes });
        }
        let window = Interval::free(day.and_time(opens), day.and_time(closes))?;
        Ok(Self { day, window })
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn opens_at(&self) -> NaiveDateTime {
        self.window.start()
    }

    pub fn closes_at(&self) -> NaiveDateTime {
        self.window.finish()
    }

    /// The whole day as a single free interval.
    pub fn window(&self) -> Interval {
        self.window
    }
}

//! Choices offered when booking into an open slot.
//!
//! An open slot is split into 15-minute steps: every step is a possible start
//! time, and every multiple of 15 minutes that fits in the slot is a possible
//! duration.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{Result, ScheduleError};
use crate::interval::Interval;

/// Booking granularity in minutes.
pub const STEP_MINUTES: i64 = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingOptions {
    slot: Interval,
    start_times: Vec<NaiveDateTime>,
    durations: Vec<i64>,
}

impl BookingOptions {
    /// # Errors
    /// Returns `ScheduleError::SlotTooShort` when the slot holds no full step.
    pub fn for_slot(slot: &Interval) -> Result<Self> {
        let steps = slot.duration_minutes() / STEP_MINUTES;
        if steps == 0 {
            return Err(ScheduleError::SlotTooShort {
                minutes: slot.duration_minutes(),
                step: STEP_MINUTES,
            });
        }

        let start_times = (0..steps)
            .map(|i| slot.start() + Duration::minutes(i * STEP_MINUTES))
            .collect();
        let durations = (1..=steps).map(|i| i * STEP_MINUTES).collect();

        Ok(Self {
            slot: *slot,
            start_times,
            durations,
        })
    }

    pub fn slot(&self) -> &Interval {
        &self.slot
    }

    pub fn start_times(&self) -> &[NaiveDateTime] {
        &self.start_times
    }

    pub fn durations(&self) -> &[i64] {
        &self.durations
    }

    pub fn end_time(&self) -> NaiveTime {
        self.slot.finish().time()
    }

    /// Turn a picked start time and duration into the appointment interval.
    ///
    /// # Errors
    /// Returns `ScheduleError::UnavailableChoice` if either value is not on
    /// offer or the appointment would run past the end of the slot.
    pub fn choose(&self, start_time: NaiveTime, duration_minutes: i64) -> Result<Interval> {
        let start = self
            .start_times
            .iter()
            .copied()
            .find(|s| s.time() == start_time)
            .ok_or_else(|| {
                ScheduleError::UnavailableChoice(format!(
                    "start time {} is not offered",
                    start_time.format("%H:%M")
                ))
            })?;

        if !self.durations.contains(&duration_minutes) {
            return Err(ScheduleError::UnavailableChoice(format!(
                "duration of {duration_minutes} minutes is not offered"
            )));
        }

        let appointment = Interval::from_duration(start, duration_minutes, true)?;
        if !self.slot.contains(&appointment) {
            return Err(ScheduleError::UnavailableChoice(format!(
                "{appointment} runs past the end of the slot at {}",
                self.end_time().format("%H:%M")
            )));
        }

        Ok(appointment)
    }
}

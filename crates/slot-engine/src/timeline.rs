//! Build day timelines of alternating booked and free intervals.
//!
//! Bookings are ordered by finish time, then the gaps between consecutive
//! bookings (and between the office's opening/closing and the first/last
//! booking) are filled with free intervals. Bookings are never merged or
//! clipped; two back-to-back bookings stay two entries.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::Result;
use crate::interval::Interval;
use crate::office::{DailyHours, OfficeHours};
use crate::week::WeekWindow;

/// Fill one day's office window around its bookings.
///
/// `booked` may be empty or unsorted. It is expected to hold booked,
/// non-overlapping intervals inside the office window; nothing outside the
/// window is clipped or rejected here (see [`crate::check_availability`] for
/// the validating path).
///
/// A free interval is emitted only for a strictly positive gap, so a booking
/// starting exactly at opening time produces no leading free entry.
pub fn build_day_timeline(booked: &[Interval], office_hours: &OfficeHours) -> Vec<Interval> {
    if booked.is_empty() {
        return vec![office_hours.window()];
    }

    // Stable sort: bookings with the same finish keep their input order.
    let mut sorted = booked.to_vec();
    sorted.sort_by_key(Interval::finish);

    let mut timeline = Vec::with_capacity(sorted.len() * 2 + 1);
    let mut cursor = office_hours.opens_at();

    for booking in sorted {
        if let Some(gap) = free_gap(cursor, booking.start()) {
            timeline.push(gap);
        }
        timeline.push(booking);
        cursor = booking.finish();
    }

    if let Some(gap) = free_gap(cursor, office_hours.closes_at()) {
        timeline.push(gap);
    }

    timeline
}

fn free_gap(from: NaiveDateTime, to: NaiveDateTime) -> Option<Interval> {
    if from < to {
        Interval::free(from, to).ok()
    } else {
        None
    }
}

/// Build a timeline for every day of `window`.
///
/// Bookings are grouped by the date they start on. Bookings dated outside the
/// window are ignored.
///
/// # Errors
/// Returns `ScheduleError::InvalidOfficeHours` if `hours` does not open before
/// it closes.
pub fn build_week(
    window: &WeekWindow,
    bookings: &[Interval],
    hours: &DailyHours,
) -> Result<BTreeMap<NaiveDate, Vec<Interval>>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<Interval>> =
        window.days().map(|day| (day, Vec::new())).collect();

    for booking in bookings {
        if let Some(day) = by_day.get_mut(&booking.start().date()) {
            day.push(*booking);
        }
    }

    by_day
        .into_iter()
        .map(|(day, booked)| {
            let office_hours = hours.on(day)?;
            Ok((day, build_day_timeline(&booked, &office_hours)))
        })
        .collect()
}

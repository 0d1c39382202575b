//! Gate for new bookings: office-hours bounds and overlap with existing
//! appointments.

use crate::error::{Result, ScheduleError};
use crate::interval::Interval;
use crate::office::OfficeHours;

/// Decide whether `candidate` can be booked.
///
/// Checks run in order: the candidate must lie within office hours, then it
/// must not strictly overlap any entry of `booked`. A candidate that starts
/// exactly when a booking finishes (or vice versa) does not conflict.
///
/// `booked` should be freshly fetched from the provider; the result is only
/// as current as that snapshot.
///
/// # Errors
/// - `ScheduleError::OutsideOfficeHours` if the candidate starts before
///   opening or finishes after closing.
/// - `ScheduleError::SlotConflict` with the first overlapping booking.
pub fn check_availability(
    candidate: &Interval,
    booked: &[Interval],
    office_hours: &OfficeHours,
) -> Result<()> {
    if candidate.start() < office_hours.opens_at() || candidate.finish() > office_hours.closes_at()
    {
        return Err(ScheduleError::OutsideOfficeHours {
            candidate: *candidate,
            opens_at: office_hours.opens_at(),
            closes_at: office_hours.closes_at(),
        });
    }

    if let Some(conflict) = booked.iter().find(|b| b.overlaps(candidate)) {
        return Err(ScheduleError::SlotConflict {
            candidate: *candidate,
            booked: *conflict,
        });
    }

    Ok(())
}

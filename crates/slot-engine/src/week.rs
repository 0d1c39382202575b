//! Seven-day viewing window.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Number of days shown per week view.
pub const WEEK_DAYS: i64 = 7;

/// A week of days starting no earlier than "now", with links to the
/// neighbouring weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
    next_week: NaiveDateTime,
    previous_week: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl WeekWindow {
    /// Resolve the window requested with `from`, never starting in the past.
    ///
    /// A missing or past `from` starts at `now` and has no previous week: the
    /// view does not page back before the current day.
    pub fn resolve(from: Option<NaiveDateTime>, now: NaiveDateTime) -> Self {
        let from = from.unwrap_or(now);
        let start = from.max(now);
        let end = start + Duration::days(WEEK_DAYS - 1);
        let previous_week = (from > now).then(|| {
            (
                start - Duration::days(WEEK_DAYS),
                start - Duration::days(1),
            )
        });

        Self {
            start,
            end,
            next_week: end + Duration::days(1),
            previous_week,
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn next_week(&self) -> NaiveDateTime {
        self.next_week
    }

    pub fn previous_week(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.previous_week
    }

    /// The calendar dates covered, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.start.date();
        (0..WEEK_DAYS).map(move |offset| first + Duration::days(offset))
    }
}

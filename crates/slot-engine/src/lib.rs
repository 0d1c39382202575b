//! # slot-engine
//!
//! Free/busy day timelines and booking availability checks for a single
//! clinic office.
//!
//! Booked appointments come from the practice-management provider; this crate
//! fills the gaps between them with free intervals inside the office's
//! operating hours and decides whether a proposed appointment may be booked.
//! Everything here is pure and synchronous, so it is safe to call from any
//! number of request tasks at once.
//!
//! ## Modules
//!
//! - [`interval`] — immutable booked/free time range
//! - [`office`] — daily operating hours and their per-day window
//! - [`timeline`] — gap-filling day and week timelines
//! - [`availability`] — office-hours and overlap gate for new bookings
//! - [`week`] — seven-day viewing window with previous/next links
//! - [`booking`] — start-time and duration choices for an open slot
//! - [`error`] — Error types

pub mod availability;
pub mod booking;
pub mod error;
pub mod interval;
pub mod office;
pub mod timeline;
pub mod week;

pub use availability::check_availability;
pub use booking::BookingOptions;
pub use error::ScheduleError;
pub use interval::Interval;
pub use office::{DailyHours, OfficeHours};
pub use timeline::{build_day_timeline, build_week};
pub use week::WeekWindow;

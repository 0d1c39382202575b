//! The provider operations the scheduling service depends on.

use async_trait::async_trait;
use chrono::NaiveDate;
use slot_engine::{DailyHours, Interval};

use crate::error::Result;
use crate::models::{NewAppointment, NewPatient, PatientId};

/// Read and write access to the practice-management provider.
///
/// Implementations handle authentication, retries and pagination; callers
/// see flattened results or a single error.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Operating hours of the configured doctor's office.
    async fn office_hours(&self) -> Result<DailyHours>;

    /// Every booked appointment dated between `from` and `to`, inclusive.
    async fn appointments(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Interval>>;

    async fn create_patient(&self, patient: &NewPatient) -> Result<PatientId>;

    async fn create_appointment(&self, appointment: &NewAppointment) -> Result<()>;
}

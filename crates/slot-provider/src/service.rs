//! Scheduling flows built from provider data and the availability engine.
//!
//! Each call fetches fresh office hours and bookings; the provider may be
//! booked by other systems at any time, so nothing is reused between calls.
//! A booking made by someone else between the final availability check and
//! the appointment write is not detected.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use slot_engine::{
    build_week, check_availability, BookingOptions, Interval, OfficeHours, WeekWindow,
};
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::gateway::ProviderGateway;
use crate::models::{NewAppointment, NewPatient, PatientId};

/// Seven day timelines plus the window they cover.
#[derive(Debug, Clone, Serialize)]
pub struct WeekView {
    pub window: WeekWindow,
    pub days: BTreeMap<NaiveDate, Vec<Interval>>,
}

/// A booking into an open slot: the slot that was offered, the picked start
/// time and length, and the new patient.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub slot_start: NaiveDateTime,
    pub slot_minutes: i64,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub patient: NewPatient,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookedAppointment {
    pub patient_id: PatientId,
    pub appointment: Interval,
}

pub struct SchedulingService<G> {
    gateway: G,
}

impl<G: ProviderGateway> SchedulingService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Timelines for the week requested with `from`, never starting before
    /// `now`.
    pub async fn week(
        &self,
        from: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<WeekView, ServiceError> {
        let window = WeekWindow::resolve(from, now);
        let hours = self.gateway.office_hours().await?;
        let bookings = self
            .gateway
            .appointments(window.start().date(), window.end().date())
            .await?;
        debug!(bookings = bookings.len(), start = %window.start(), "building week");

        let days = build_week(&window, &bookings, &hours)?;
        Ok(WeekView { window, days })
    }

    /// Validate an open slot against office hours and current bookings and
    /// return the choices it offers.
    pub async fn check(
        &self,
        slot_start: NaiveDateTime,
        slot_minutes: i64,
    ) -> Result<BookingOptions, ServiceError> {
        let (slot, _, _) = self.validated_slot(slot_start, slot_minutes).await?;
        Ok(BookingOptions::for_slot(&slot)?)
    }

    /// Create the patient and the appointment if the chosen time is still
    /// free.
    pub async fn book(&self, request: &BookingRequest) -> Result<BookedAppointment, ServiceError> {
        let (slot, booked, office_hours) = self
            .validated_slot(request.slot_start, request.slot_minutes)
            .await?;
        let options = BookingOptions::for_slot(&slot)?;
        let appointment = options.choose(request.start_time, request.duration_minutes)?;
        check_availability(&appointment, &booked, &office_hours)?;

        let patient_id = self.gateway.create_patient(&request.patient).await?;
        self.gateway
            .create_appointment(&NewAppointment {
                patient_id: patient_id.clone(),
                scheduled_time: appointment.start(),
                duration_minutes: appointment.duration_minutes(),
            })
            .await?;
        info!(patient = %patient_id, %appointment, "booked appointment");

        Ok(BookedAppointment {
            patient_id,
            appointment,
        })
    }

    async fn validated_slot(
        &self,
        slot_start: NaiveDateTime,
        slot_minutes: i64,
    ) -> Result<(Interval, Vec<Interval>, OfficeHours), ServiceError> {
        let slot = Interval::from_duration(slot_start, slot_minutes, true)?;
        let day = slot_start.date();
        let office_hours = self.gateway.office_hours().await?.on(day)?;
        let booked = self.gateway.appointments(day, day).await?;
        check_availability(&slot, &booked, &office_hours)?;
        Ok((slot, booked, office_hours))
    }
}

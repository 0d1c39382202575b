//! HTTP client for the provider API.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use slot_engine::{DailyHours, Interval};
use tracing::{debug, info, warn};

use crate::auth::{AuthSession, Clock, SystemClock};
use crate::config::ProviderConfig;
use crate::error::{GatewayError, Result};
use crate::gateway::ProviderGateway;
use crate::models::{NewAppointment, NewPatient, PatientId};
use crate::records::{AppointmentRecord, CreatedPatient, OfficeRecord, Page};
use crate::retry::RetryPolicy;

pub struct ProviderClient {
    http: Client,
    config: ProviderConfig,
    session: AuthSession,
    retry: RetryPolicy,
}

impl ProviderClient {
    /// Client with the system clock and the configured attempt limit.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let retry = RetryPolicy {
            attempt_limit: config.attempt_limit,
            ..RetryPolicy::default()
        };
        Self::with_parts(config, retry, Arc::new(SystemClock))
    }

    pub fn with_parts(
        config: ProviderConfig,
        retry: RetryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("slots/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let session = AuthSession::new(http.clone(), &config, clock);
        Ok(Self {
            http,
            config,
            session,
            retry,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Send an authorized request, refreshing the token on 401 and backing off
    /// on 5xx, for at most `attempt_limit` retries.
    ///
    /// `build` is called once per attempt so every attempt carries the
    /// current token.
    async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut token = self.session.bearer().await?;
        let mut retries = 0;

        loop {
            let response = build(&self.http).bearer_auth(&token).send().await?;
            let status = response.status();
            debug!(%status, url = %response.url(), attempt = retries + 1, "provider response");

            if status.is_success() {
                return Ok(response);
            }

            let retryable = status == StatusCode::UNAUTHORIZED || status.is_server_error();
            if !retryable || retries >= self.retry.attempt_limit {
                let body = response.text().await.unwrap_or_default();
                return Err(GatewayError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            retries += 1;
            if status == StatusCode::UNAUTHORIZED {
                token = self.session.refresh_rejected(&token).await?;
            } else {
                warn!(%status, retry = retries, "provider error, retrying");
                self.retry.wait(retries).await;
            }
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ProviderGateway for ProviderClient {
    async fn office_hours(&self) -> Result<DailyHours> {
        let url = self.config.url("/api/offices");
        let attempts = self.retry.max_attempts();

        for attempt in 1..=attempts {
            let response = self
                .send(|http| http.get(&url).query(&[("doctor", &self.config.doctor_id)]))
                .await?;
            let page: Page<OfficeRecord> = Self::read_json(response).await?;

            if let Some(office) = page.results.first() {
                return office.daily_hours();
            }
            warn!(attempt, doctor = %self.config.doctor_id, "no office listed for doctor");
            if attempt < attempts {
                self.retry.wait(attempt).await;
            }
        }

        Err(GatewayError::NoOffice { attempts })
    }

    async fn appointments(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Interval>> {
        let date_range = format!("{}/{}", from.format("%Y-%m-%d"), to.format("%Y-%m-%d"));
        let first = self.config.url("/api/appointments");

        let mut intervals = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(first.clone());
        while let Some(url) = next {
            if !seen.insert(url.clone()) {
                warn!(%url, pages = seen.len(), "appointment pagination revisits a page");
                return Err(GatewayError::InvalidRecord(format!(
                    "appointment page {url} was already fetched"
                )));
            }
            let response = if url == first {
                self.send(|http| http.get(&url).query(&[("date_range", &date_range)]))
                    .await?
            } else {
                self.send(|http| http.get(&url)).await?
            };
            let page: Page<AppointmentRecord> = Self::read_json(response).await?;
            debug!(count = page.results.len(), "fetched appointment page");

            for record in &page.results {
                intervals.push(record.interval()?);
            }
            next = page.next;
        }

        Ok(intervals)
    }

    async fn create_patient(&self, patient: &NewPatient) -> Result<PatientId> {
        let url = self.config.url("/api/patients");
        let date_of_birth = patient.date_of_birth.format("%Y-%m-%d").to_string();
        let gender = patient.gender.to_string();
        let form = [
            ("doctor", self.config.doctor_id.as_str()),
            ("date_of_birth", date_of_birth.as_str()),
            ("email", patient.email.as_str()),
            ("first_name", patient.first_name.as_str()),
            ("last_name", patient.last_name.as_str()),
            ("gender", gender.as_str()),
            ("cell_phone", patient.phone.as_str()),
        ];

        let response = self.send(|http| http.post(&url).form(&form)).await?;
        let created: CreatedPatient = Self::read_json(response).await?;
        let id = created.patient_id()?;
        info!(patient = %id, "created patient");
        Ok(id)
    }

    async fn create_appointment(&self, appointment: &NewAppointment) -> Result<()> {
        let url = self.config.url("/api/appointments");
        let patient = appointment.patient_id.to_string();
        let scheduled_time = appointment
            .scheduled_time
            .format("%Y-%m-%d %H:%M")
            .to_string();
        let duration = appointment.duration_minutes.to_string();
        let form = [
            ("patient", patient.as_str()),
            ("doctor", self.config.doctor_id.as_str()),
            ("scheduled_time", scheduled_time.as_str()),
            ("duration", duration.as_str()),
            ("office", self.config.office_id.as_str()),
            ("exam_room", self.config.exam_room.as_str()),
        ];

        self.send(|http| http.post(&url).form(&form)).await?;
        info!(%patient, %scheduled_time, %duration, "created appointment");
        Ok(())
    }
}

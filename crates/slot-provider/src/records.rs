//! Wire records of the provider API and their conversion into engine types.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Deserialize;
use slot_engine::{DailyHours, Interval};

use crate::error::{GatewayError, Result};
use crate::models::PatientId;

/// One page of a paginated listing. `next` is the absolute URL of the
/// following page, or null on the last one.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct OfficeRecord {
    pub start_time: String,
    pub end_time: String,
}

impl OfficeRecord {
    pub fn daily_hours(&self) -> Result<DailyHours> {
        Ok(DailyHours::new(
            parse_clock_time(&self.start_time)?,
            parse_clock_time(&self.end_time)?,
        ))
    }
}

/// Minutes sent either as a JSON number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Minutes {
    Number(i64),
    Text(String),
}

impl Minutes {
    pub fn value(&self) -> Result<i64> {
        match self {
            Minutes::Number(n) => Ok(*n),
            Minutes::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| GatewayError::InvalidRecord(format!("duration {s:?}"))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AppointmentRecord {
    pub last_billed_date: String,
    pub duration: Minutes,
}

impl AppointmentRecord {
    /// The booked interval this appointment occupies.
    pub fn interval(&self) -> Result<Interval> {
        let start = parse_timestamp(&self.last_billed_date)?;
        let minutes = self.duration.value()?;
        Interval::from_duration(start, minutes, true)
            .map_err(|e| GatewayError::InvalidRecord(e.to_string()))
    }
}

/// Identifier returned when a patient is created, numeric or string.
#[derive(Debug, Deserialize)]
pub struct CreatedPatient {
    pub id: serde_json::Value,
}

impl CreatedPatient {
    pub fn patient_id(&self) -> Result<PatientId> {
        match &self.id {
            serde_json::Value::String(s) if !s.is_empty() => Ok(PatientId(s.clone())),
            serde_json::Value::Number(n) => Ok(PatientId(n.to_string())),
            other => Err(GatewayError::InvalidRecord(format!("patient id {other}"))),
        }
    }
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a naive local timestamp in any of the formats the provider emits.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| GatewayError::InvalidRecord(format!("timestamp {raw:?}")))
}

fn parse_clock_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| GatewayError::InvalidRecord(format!("time {raw:?}")))
}

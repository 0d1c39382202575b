//! # slot-provider
//!
//! Gateway to the practice-management provider plus the scheduling service
//! that feeds provider data through [`slot_engine`].
//!
//! The provider is the source of truth for offices, appointments and
//! patients. Nothing fetched here is cached across calls except the bearer
//! token, which lives in an explicitly owned [`AuthSession`].
//!
//! ## Modules
//!
//! - [`config`] — provider credentials and identifiers from the environment
//! - [`auth`] — token refresh session with an injectable clock
//! - [`retry`] — bounded retry and backoff policy
//! - [`client`] — HTTP client implementing [`ProviderGateway`]
//! - [`gateway`] — the gateway trait consumed by the service
//! - [`models`] — patient and appointment requests
//! - [`records`] — provider wire records
//! - [`service`] — week view, availability check and booking flow
//! - [`error`] — Error types

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod records;
pub mod retry;
pub mod service;

pub use auth::{AuthSession, Clock, SystemClock};
pub use client::ProviderClient;
pub use config::ProviderConfig;
pub use error::{ConfigError, GatewayError, ServiceError};
pub use gateway::ProviderGateway;
pub use models::{Gender, NewAppointment, NewPatient, PatientId};
pub use retry::RetryPolicy;
pub use service::{BookedAppointment, BookingRequest, SchedulingService, WeekView};

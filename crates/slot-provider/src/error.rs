//! Error types for provider access and the scheduling service.

use slot_engine::ScheduleError;
use thiserror::Error;

/// Failures talking to the provider.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Token refresh failed with {status}: {body}")]
    Auth { status: u16, body: String },

    #[error("No office found after {attempts} attempts")]
    NoOffice { attempts: u32 },

    #[error("Malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid provider record: {0}")]
    InvalidRecord(String),
}

impl GatewayError {
    /// Whether the provider itself is unavailable, as opposed to rejecting
    /// the request.
    pub fn is_unavailable(&self) -> bool {
        match self {
            GatewayError::NoOffice { .. } | GatewayError::Http(_) => true,
            GatewayError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Missing or malformed configuration.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Failures of a scheduling request.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

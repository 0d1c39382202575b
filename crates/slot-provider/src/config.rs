//! Provider configuration loaded from the environment.

use std::fmt;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://drchrono.com";
pub const DEFAULT_ATTEMPT_LIMIT: u32 = 3;

#[derive(Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub doctor_id: String,
    pub office_id: String,
    pub exam_room: String,
    pub attempt_limit: u32,
}

impl ProviderConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| -> Result<String, ConfigError> {
            lookup(var)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let attempt_limit = match lookup("REQUEST_ATTEMPT_LIMIT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "REQUEST_ATTEMPT_LIMIT",
                value: raw,
            })?,
            None => DEFAULT_ATTEMPT_LIMIT,
        };

        let base_url = lookup("PROVIDER_BASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            base_url,
            client_id: required("PROVIDER_CLIENT_ID")?,
            client_secret: required("PROVIDER_CLIENT_SECRET")?,
            refresh_token: required("PROVIDER_REFRESH_TOKEN")?,
            doctor_id: required("DOCTOR_ID")?,
            office_id: required("OFFICE_ID")?,
            exam_room: required("EXAM_ROOM")?,
            attempt_limit,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// Credentials stay out of logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("doctor_id", &self.doctor_id)
            .field("office_id", &self.office_id)
            .field("exam_room", &self.exam_room)
            .field("attempt_limit", &self.attempt_limit)
            .finish()
    }
}

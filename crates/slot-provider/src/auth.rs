//! Bearer-token session for the provider API.
//!
//! The session owns the current access token and knows how to exchange the
//! configured refresh token for a new one. It is shared by reference between
//! concurrent requests; refreshes are serialized behind a write lock so a
//! burst of 401s triggers a single token exchange.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::{GatewayError, Result};
use crate::records::TokenGrant;

/// Tokens are refreshed this long before they expire.
const EXPIRY_SKEW_SECONDS: i64 = 60;

/// Source of the current time, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_none_or(|at| now + Duration::seconds(EXPIRY_SKEW_SECONDS) < at)
    }
}

pub struct AuthSession {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    clock: Arc<dyn Clock>,
    token: RwLock<Option<AccessToken>>,
}

impl AuthSession {
    pub fn new(http: reqwest::Client, config: &ProviderConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            http,
            token_url: config.url("/o/token/"),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_token: config.refresh_token.clone(),
            clock,
            token: RwLock::new(None),
        }
    }

    /// The current access token, exchanging the refresh token first if none
    /// is held or the held one is about to expire.
    pub async fn bearer(&self) -> Result<String> {
        let now = self.clock.now();
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_fresh(now) {
                return Ok(token.value.clone());
            }
        }

        let mut guard = self.token.write().await;
        if let Some(token) = guard.as_ref() {
            if token.is_fresh(now) {
                return Ok(token.value.clone());
            }
        }
        let token = self.exchange().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    /// Replace a token the provider rejected.
    ///
    /// If another request already swapped `rejected` out, the newer token is
    /// returned without another exchange.
    pub async fn refresh_rejected(&self, rejected: &str) -> Result<String> {
        let mut guard = self.token.write().await;
        if let Some(token) = guard.as_ref() {
            if token.value != rejected {
                return Ok(token.value.clone());
            }
        }
        warn!("provider rejected access token, refreshing");
        let token = self.exchange().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    async fn exchange(&self) -> Result<AccessToken> {
        debug!(url = %self.token_url, "exchanging refresh token");
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("refresh_token", self.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let grant: TokenGrant = serde_json::from_str(&body)?;
        let expires_at = grant
            .expires_in
            .map(|secs| self.clock.now() + Duration::seconds(secs));
        Ok(AccessToken {
            value: grant.access_token,
            expires_at,
        })
    }
}

//! Bearer tokens for the analysis endpoints
//!
//! Tokens come from an external identity provider. `StaticToken` covers API
//! keys from the environment; `CachedToken` keeps an id token with its
//! expiry and refreshes it shortly before it lapses.

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Refresh this long before the token actually expires
pub const REFRESH_SKEW_SECS: i64 = 5 * 60;

#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current bearer token; fails when the caller is not signed in
    async fn token(&self) -> Result<String>;
}

/// A fixed token, e.g. an API key
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<String> {
        if self.0.trim().is_empty() {
            return Err(ClientError::Auth("no API token configured".to_string()));
        }
        Ok(self.0.clone())
    }
}

/// Signed-in identity as stored locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub id_token: String,
    pub refresh_token: Option<String>,
    pub email: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    /// Token valid for `expires_in` seconds from `now`
    pub fn issued(id_token: impl Into<String>, expires_in: i64, now: DateTime<Utc>) -> Self {
        Self {
            id_token: id_token.into(),
            refresh_token: None,
            email: None,
            expires_at: now + Duration::seconds(expires_in),
        }
    }

    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at - Duration::seconds(REFRESH_SKEW_SECS)
    }
}

/// Exchanges a refresh token for a new id token
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<StoredToken>;
}

/// Cached id token with refresh-on-expiry
pub struct CachedToken<R> {
    stored: Mutex<Option<StoredToken>>,
    refresher: R,
}

impl<R: TokenRefresher> CachedToken<R> {
    pub fn new(refresher: R) -> Self {
        Self {
            stored: Mutex::new(None),
            refresher,
        }
    }

    pub fn with_token(stored: StoredToken, refresher: R) -> Self {
        Self {
            stored: Mutex::new(Some(stored)),
            refresher,
        }
    }

    pub async fn sign_in(&self, stored: StoredToken) {
        *self.stored.lock().await = Some(stored);
    }

    pub async fn sign_out(&self) {
        *self.stored.lock().await = None;
    }

    pub async fn current(&self) -> Option<StoredToken> {
        self.stored.lock().await.clone()
    }

    /// Token as of `now`, refreshing if it is within the skew of expiry
    pub async fn token_at(&self, now: DateTime<Utc>) -> Result<String> {
        let mut guard = self.stored.lock().await;
        let stored = guard
            .as_ref()
            .ok_or_else(|| ClientError::Auth("not signed in".to_string()))?;

        if !stored.needs_refresh(now) {
            return Ok(stored.id_token.clone());
        }

        let refresh_token = stored
            .refresh_token
            .clone()
            .ok_or_else(|| ClientError::Auth("session expired".to_string()))?;

        tracing::debug!("Refreshing id token (expires {})", stored.expires_at);
        let mut refreshed = match self.refresher.refresh(&refresh_token).await {
            Ok(refreshed) => refreshed,
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                *guard = None;
                return Err(ClientError::Auth("session expired".to_string()));
            }
        };

        if refreshed.email.is_none() {
            refreshed.email = stored.email.clone();
        }
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = Some(refresh_token);
        }
        let token = refreshed.id_token.clone();
        *guard = Some(refreshed);
        Ok(token)
    }
}

#[async_trait]
impl<R: TokenRefresher> TokenProvider for CachedToken<R> {
    async fn token(&self) -> Result<String> {
        self.token_at(Utc::now()).await
    }
}

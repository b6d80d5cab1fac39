//! Client configuration from the environment

use crate::error::ClientError;
use shared_types::{DEFAULT_API_BASE, MAX_TEXT_CHARS};

pub const ENV_API_URL: &str = "TERMSHIFT_API_URL";
pub const ENV_API_TOKEN: &str = "TERMSHIFT_API_TOKEN";
pub const ENV_MAX_CHARS: &str = "TERMSHIFT_MAX_CHARS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash
    pub api_base: String,
    pub api_token: Option<String>,
    /// Text longer than this many characters is truncated before sending
    pub max_chars: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_token: None,
            max_chars: MAX_TEXT_CHARS,
        }
    }
}

impl ClientConfig {
    /// Load from `TERMSHIFT_*` variables, reading a `.env` file if present
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_api_base(&base)?;
        }
        config.api_token = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty());
        if let Some(raw) = lookup(ENV_MAX_CHARS) {
            config.max_chars = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("{} must be a positive integer, got {:?}", ENV_MAX_CHARS, raw))
            })?;
        }

        Ok(config)
    }

    pub fn with_api_base(mut self, base: &str) -> Result<Self, ClientError> {
        let base = base.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "API base must be an http(s) URL, got {:?}",
                base
            )));
        }
        self.api_base = base.to_string();
        Ok(self)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

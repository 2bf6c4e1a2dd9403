//! Provider and poll configuration parsed from environment variables.

use std::time::Duration;

use super::types::ProviderError;

pub const API_TOKEN_VAR: &str = "REPLICATE_API_TOKEN";
pub const DEFAULT_API_BASE_URL: &str = "https://api.replicate.com/v1";
pub const DEFAULT_MODEL_VERSION: &str = "ibm-granite/granite-3.3-8b-instruct";
pub const DEFAULT_MODEL_LABEL: &str = "IBM Granite 3.3 8B Instruct";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_token: String,
    pub base_url: String,
    pub model_version: String,
    pub model_label: String,
    pub timeouts: ProviderTimeouts,
}

impl ProviderConfig {
    /// Build typed provider config from environment variables.
    ///
    /// Required:
    /// - `REPLICATE_API_TOKEN`
    ///
    /// Optional:
    /// - `REPLICATE_API_BASE_URL`: default Replicate v1 API
    /// - `REPLICATE_MODEL_VERSION`: default Granite 3.3 8B Instruct
    /// - `REPLICATE_MODEL_LABEL`: display name reported as `source`
    /// - `PROVIDER_REQUEST_TIMEOUT_SECS`: default 30
    /// - `PROVIDER_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingApiToken`] when the token is unset or blank.
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_token = std::env::var(API_TOKEN_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiToken { var: API_TOKEN_VAR.into() })?;

        let base_url = std::env::var("REPLICATE_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let model_version =
            std::env::var("REPLICATE_MODEL_VERSION").unwrap_or_else(|_| DEFAULT_MODEL_VERSION.to_string());
        let model_label = std::env::var("REPLICATE_MODEL_LABEL").unwrap_or_else(|_| DEFAULT_MODEL_LABEL.to_string());
        let timeouts = ProviderTimeouts {
            request_secs: env_parse("PROVIDER_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("PROVIDER_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_token, base_url, model_version, model_label, timeouts })
    }
}

/// Poll cadence for a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Constant delay before every status fetch.
    pub interval: Duration,
    /// Maximum number of status fetches per job.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self { interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS), max_attempts: DEFAULT_POLL_MAX_ATTEMPTS }
    }
}

impl PollPolicy {
    /// - `PREDICTION_POLL_INTERVAL_MS`: default 2000
    /// - `PREDICTION_POLL_MAX_ATTEMPTS`: default 60, at least 1
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            interval: Duration::from_millis(env_parse("PREDICTION_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)),
            max_attempts: env_parse("PREDICTION_POLL_MAX_ATTEMPTS", DEFAULT_POLL_MAX_ATTEMPTS).max(1),
        }
    }
}

/// Load `.env` from the working directory.
///
/// Returns the error for a `.env` that exists but cannot be read or parsed.
/// A missing file is not an error.
#[must_use]
pub fn load_dotenv() -> Option<dotenvy::Error> {
    dotenv_failure(dotenvy::dotenv())
}

pub(crate) fn dotenv_failure<T>(result: Result<T, dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(e),
    }
}

pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Prediction types: provider jobs, generation parameters, and errors.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by prediction client operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The required API token environment variable is not set.
    #[error("missing API token: env var {var} not set")]
    MissingApiToken { var: String },

    /// The HTTP request to the provider failed at the transport level.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ProviderError {
    /// HTTP status carried by the error, if the provider answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl ErrorCode for ProviderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingApiToken { .. } => "E_MISSING_API_TOKEN",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// PREDICTION
// =============================================================================

/// Provider-reported job status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Queued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    /// Any status string this client does not know. Treated as still running.
    #[serde(other)]
    Unknown,
}

impl PredictionStatus {
    /// `true` once the provider will not change the job any further.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// Job output: either one string or fragments to be joined in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionOutput {
    Text(String),
    Fragments(Vec<String>),
}

impl PredictionOutput {
    /// Concatenate fragments with no separator.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Fragments(parts) => parts.concat(),
        }
    }
}

/// A provider job as returned by creation and status fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<PredictionOutput>,
    #[serde(default, deserialize_with = "deserialize_error_detail")]
    pub error: Option<String>,
}

/// The provider reports `error` as a string, an object, or `null`.
fn deserialize_error_detail<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

// =============================================================================
// GENERATION PARAMETERS
// =============================================================================

/// Sampling parameters sent with every job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
    /// Single stop string; the provider field is plural but takes one value.
    #[serde(rename = "stop_sequences")]
    pub stop_sequence: String,
}

impl GenerationParams {
    /// Conversational defaults.
    #[must_use]
    pub fn chat() -> Self {
        Self {
            max_new_tokens: 1024,
            temperature: 0.7,
            top_p: 0.9,
            repetition_penalty: 1.1,
            stop_sequence: "Human:".into(),
        }
    }

    /// Lower temperature and a longer budget for code.
    #[must_use]
    pub fn code() -> Self {
        Self {
            max_new_tokens: 2048,
            temperature: 0.2,
            top_p: 0.9,
            repetition_penalty: 1.1,
            stop_sequence: "Human:".into(),
        }
    }
}

// =============================================================================
// PREDICTION API TRAIT
// =============================================================================

/// Provider-neutral async trait for job creation and status fetches.
/// Enables mocking in tests.
#[async_trait::async_trait]
pub trait PredictionApi: Send + Sync {
    /// Create a job for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] on transport failure, non-2xx status, or a
    /// malformed body.
    async fn create_prediction(&self, prompt: &str, params: &GenerationParams) -> Result<Prediction, ProviderError>;

    /// Fetch the current state of job `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] on transport failure, non-2xx status, or a
    /// malformed body.
    async fn get_prediction(&self, id: &str) -> Result<Prediction, ProviderError>;

    /// Display label for the model behind this client.
    fn model_label(&self) -> &str;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

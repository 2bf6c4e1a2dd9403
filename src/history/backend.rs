//! Client transport to the relay's `/chat` and `/generate-code` routes.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ErrorCode;
use crate::types::{ChatReply, ChatRequest, CodeReply, CodeRequest, ConversationTurn};

/// Generous enough to cover the server's full poll window.
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 150;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("relay returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl ErrorCode for BackendError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Http(_) => "E_BACKEND_HTTP",
            Self::Status { .. } => "E_BACKEND_STATUS",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status { status, .. } => *status >= 500,
        }
    }
}

/// What the session needs from the relay.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn chat(&self, messages: &[ConversationTurn]) -> Result<ChatReply, BackendError>;
    async fn generate_code(&self, prompt: &str) -> Result<CodeReply, BackendError>;
}

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the reqwest client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS))
    }

    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the reqwest client cannot be built.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /healthz`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on transport failure or a non-2xx status.
    pub async fn health(&self) -> Result<(), BackendError> {
        let response = self.http.get(format!("{}/healthz", self.base_url)).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self.http.post(format!("{}{path}", self.base_url)).json(body).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status { status: status.as_u16(), body })
    }
}

#[async_trait]
impl AssistantBackend for HttpBackend {
    async fn chat(&self, messages: &[ConversationTurn]) -> Result<ChatReply, BackendError> {
        let body = ChatRequest { messages: messages.to_vec() };
        self.post_json("/chat", &body).await
    }

    async fn generate_code(&self, prompt: &str) -> Result<CodeReply, BackendError> {
        let body = CodeRequest { prompt: prompt.to_owned() };
        self.post_json("/generate-code", &body).await
    }
}

#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

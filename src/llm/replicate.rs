//! Replicate predictions API client.
//!
//! Thin HTTP wrapper for `POST /predictions` and `GET /predictions/{id}`.
//! Pure parsing in `parse_prediction` for testability.

use std::time::Duration;

use super::config::ProviderConfig;
use super::types::{GenerationParams, Prediction, PredictionApi, ProviderError};

// =============================================================================
// CLIENT
// =============================================================================

pub struct ReplicateClient {
    http: reqwest::Client,
    api_token: String,
    base_url: String,
    model_version: String,
    model_label: String,
}

impl ReplicateClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::HttpClientBuild`] if the reqwest client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ProviderError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_token: config.api_token,
            base_url: config.base_url,
            model_version: config.model_version,
            model_label: config.model_label,
        })
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.api_token)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, ProviderError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::ApiRequest(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(ProviderError::ApiResponse { status, body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl PredictionApi for ReplicateClient {
    async fn create_prediction(&self, prompt: &str, params: &GenerationParams) -> Result<Prediction, ProviderError> {
        let body = ApiRequest { version: &self.model_version, input: ApiInput { prompt, params } };

        let response = self
            .http
            .post(format!("{}/predictions", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::ApiRequest(e.to_string()))?;

        let text = Self::read_body(response).await?;
        parse_prediction(&text)
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction, ProviderError> {
        let response = self
            .http
            .get(format!("{}/predictions/{id}", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(|e| ProviderError::ApiRequest(e.to_string()))?;

        let text = Self::read_body(response).await?;
        parse_prediction(&text)
    }

    fn model_label(&self) -> &str {
        &self.model_label
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    version: &'a str,
    input: ApiInput<'a>,
}

#[derive(serde::Serialize)]
struct ApiInput<'a> {
    prompt: &'a str,
    #[serde(flatten)]
    params: &'a GenerationParams,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_prediction(json: &str) -> Result<Prediction, ProviderError> {
    serde_json::from_str(json).map_err(|e| ProviderError::ApiParse(e.to_string()))
}

#[cfg(test)]
#[path = "replicate_test.rs"]
mod tests;

//! Generation service: prompt → submit → poll → normalize or fall back.
//!
//! DESIGN
//! ======
//! `generate` returns the model's text or a classified [`GenerationError`].
//! `respond` wraps it with the degraded-mode policy: every failure except a
//! missing provider becomes a fallback payload tagged
//! [`ReplyOrigin::Fallback`].

use tracing::{error, info, warn};

use crate::error::ErrorCode;
use crate::llm::PredictionApi;
use crate::llm::config::PollPolicy;
use crate::llm::poll::{CancelToken, PollOutcome, Sleeper, poll_prediction};
use crate::llm::types::{GenerationParams, ProviderError};
use crate::types::{FALLBACK_MODEL, FALLBACK_SOURCE, REAL_MODEL, ReplyOrigin};

use super::fallback;
use super::normalize::normalize_output;
use super::prompt::{CHAT_CUE, CODE_CUE};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Chat,
    Code,
}

impl GenerationMode {
    /// Cue token the prompt ends with and the model may echo back.
    #[must_use]
    pub fn cue(self) -> &'static str {
        match self {
            Self::Chat => CHAT_CUE,
            Self::Code => CODE_CUE,
        }
    }

    #[must_use]
    pub fn params(self) -> GenerationParams {
        match self {
            Self::Chat => GenerationParams::chat(),
            Self::Code => GenerationParams::code(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("prediction provider not configured")]
    NotConfigured,
    #[error("prediction submission failed (status {status:?}): {body}")]
    Submission { status: Option<u16>, body: String },
    #[error("prediction poll failed: {0}")]
    Poll(#[source] ProviderError),
    #[error("prediction failed: {}", .detail.as_deref().unwrap_or("no detail"))]
    ProviderFailure { detail: Option<String> },
    #[error("prediction not finished after {attempts} polls")]
    Timeout { attempts: u32 },
    #[error("prediction produced no usable output")]
    EmptyResult,
    #[error("prediction polling cancelled")]
    Cancelled,
}

impl GenerationError {
    /// Only a missing provider is surfaced to the caller as an error.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }
}

impl ErrorCode for GenerationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_NOT_CONFIGURED",
            Self::Submission { .. } => "E_PROVIDER_SUBMISSION",
            Self::Poll(_) => "E_PROVIDER_POLL",
            Self::ProviderFailure { .. } => "E_PROVIDER_FAILURE",
            Self::Timeout { .. } => "E_TIMEOUT_EXCEEDED",
            Self::EmptyResult => "E_EMPTY_RESULT",
            Self::Cancelled => "E_CANCELLED",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::NotConfigured | Self::Cancelled => false,
            Self::Submission { status, .. } => !matches!(status, Some(s) if (400..500).contains(s) && *s != 429),
            Self::Poll(e) => e.retryable(),
            Self::ProviderFailure { .. } | Self::Timeout { .. } | Self::EmptyResult => true,
        }
    }
}

impl From<ProviderError> for GenerationError {
    /// Classifies a job-creation failure.
    fn from(e: ProviderError) -> Self {
        let status = e.status();
        let body = match e {
            ProviderError::ApiResponse { body, .. } => body,
            other => other.to_string(),
        };
        Self::Submission { status, body }
    }
}

/// A renderable reply: model output or a fallback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub origin: ReplyOrigin,
    pub source: String,
    pub model: String,
}

impl Generation {
    fn real(text: String, model_label: &str) -> Self {
        Self { text, origin: ReplyOrigin::Real, source: model_label.to_string(), model: REAL_MODEL.to_string() }
    }

    fn fallback(text: String) -> Self {
        Self {
            text,
            origin: ReplyOrigin::Fallback,
            source: FALLBACK_SOURCE.to_string(),
            model: FALLBACK_MODEL.to_string(),
        }
    }
}

/// Provider, timer and poll cadence for one request.
#[derive(Clone, Copy)]
pub struct GenerationContext<'a> {
    pub api: &'a dyn PredictionApi,
    pub sleeper: &'a dyn Sleeper,
    pub policy: PollPolicy,
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Submit `prompt`, poll the job, and normalize its output.
///
/// # Errors
///
/// Returns the [`GenerationError`] that ended the attempt.
pub async fn generate(
    ctx: GenerationContext<'_>,
    mode: GenerationMode,
    prompt: &str,
    cancel: CancelToken,
) -> Result<String, GenerationError> {
    let params = mode.params();
    info!(?mode, prompt_len = prompt.len(), "generation: submitting prediction");

    let job = ctx
        .api
        .create_prediction(prompt, &params)
        .await
        .inspect_err(|e| warn!(?mode, error = %e, "generation: submission failed"))?;
    info!(?mode, prediction_id = %job.id, status = ?job.status, "generation: prediction created");

    let outcome = poll_prediction(ctx.api, ctx.sleeper, ctx.policy, job, cancel)
        .await
        .map_err(GenerationError::Poll)?;

    match outcome {
        PollOutcome::Succeeded(prediction) => prediction
            .output
            .as_ref()
            .and_then(|output| normalize_output(output, mode.cue()))
            .ok_or(GenerationError::EmptyResult),
        PollOutcome::Failed(prediction) => Err(GenerationError::ProviderFailure { detail: prediction.error }),
        PollOutcome::TimedOut { attempts } => Err(GenerationError::Timeout { attempts }),
        PollOutcome::Cancelled { .. } => Err(GenerationError::Cancelled),
    }
}

/// Run [`generate`] and substitute the fallback payload on failure.
///
/// `request` is the caller's original text, echoed by the code fallback.
pub async fn respond(
    ctx: GenerationContext<'_>,
    mode: GenerationMode,
    prompt: &str,
    request: &str,
    cancel: CancelToken,
) -> Generation {
    match generate(ctx, mode, prompt, cancel).await {
        Ok(text) => {
            info!(?mode, text_len = text.len(), "generation: model reply ready");
            Generation::real(text, ctx.api.model_label())
        }
        Err(e) => {
            error!(?mode, code = e.error_code(), retryable = e.retryable(), error = %e, "generation: using fallback");
            fallback_reply(mode, request)
        }
    }
}

/// Degraded-mode payload for `mode`. `request` is echoed by the code placeholder.
#[must_use]
pub fn fallback_reply(mode: GenerationMode, request: &str) -> Generation {
    Generation::fallback(fallback::compose(mode, request))
}

#[cfg(test)]
#[path = "generation_test.rs"]
mod tests;

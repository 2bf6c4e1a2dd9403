//! Chat and code-generation routes.
//!
//! A missing provider is the one hard failure (500). Past that check both
//! handlers answer 200 with a renderable payload: unreadable bodies and empty
//! input get the fallback without touching the provider, and the `origin`
//! field tells real output from fallback.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::ErrorCode;
use crate::llm::poll::CancelToken;
use crate::services::generation::{Generation, GenerationError, GenerationMode, fallback_reply, respond};
use crate::services::prompt::{format_chat, format_code};
use crate::state::AppState;
use crate::types::{ChatReply, ChatRequest, CodeReply, CodeRequest};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

pub type RouteError = (StatusCode, Json<ErrorBody>);

fn generation_error_to_response(e: &GenerationError) -> RouteError {
    error!(code = e.error_code(), error = %e, "assist: server misconfiguration");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody { error: "Server misconfiguration".into(), code: e.error_code() }),
    )
}

fn chat_reply(reply: Generation) -> Json<ChatReply> {
    Json(ChatReply { content: reply.text, source: Some(reply.source), model: Some(reply.model), origin: reply.origin })
}

fn code_reply(reply: Generation) -> Json<CodeReply> {
    Json(CodeReply { code: reply.text, source: Some(reply.source), model: Some(reply.model), origin: reply.origin })
}

/// `POST /chat`: continue a transcript.
///
/// # Errors
///
/// 500 when no provider is configured.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, RouteError> {
    let ctx = state
        .generation_context()
        .map_err(|e| generation_error_to_response(&e))?;

    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "assist: unreadable chat request");
            return Ok(chat_reply(fallback_reply(GenerationMode::Chat, "")));
        }
    };
    let latest = req.messages.last().map_or("", |turn| turn.content.as_str());

    let prompt = match format_chat(&req.messages) {
        Ok(prompt) => prompt,
        Err(e) => {
            warn!(code = e.error_code(), "assist: nothing to send");
            return Ok(chat_reply(fallback_reply(GenerationMode::Chat, latest)));
        }
    };
    info!(turns = req.messages.len(), "assist: chat request");

    let reply = respond(ctx, GenerationMode::Chat, &prompt, latest, CancelToken::never()).await;
    Ok(chat_reply(reply))
}

/// `POST /generate-code`: produce one code artifact.
///
/// # Errors
///
/// 500 when no provider is configured.
pub async fn generate_code(
    State(state): State<AppState>,
    body: Result<Json<CodeRequest>, JsonRejection>,
) -> Result<Json<CodeReply>, RouteError> {
    let ctx = state
        .generation_context()
        .map_err(|e| generation_error_to_response(&e))?;

    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "assist: unreadable code request");
            return Ok(code_reply(fallback_reply(GenerationMode::Code, "")));
        }
    };

    let prompt = match format_code(&req.prompt) {
        Ok(prompt) => prompt,
        Err(e) => {
            warn!(code = e.error_code(), "assist: nothing to send");
            return Ok(code_reply(fallback_reply(GenerationMode::Code, &req.prompt)));
        }
    };
    info!(prompt_len = req.prompt.len(), "assist: code request");

    let reply = respond(ctx, GenerationMode::Code, &prompt, &req.prompt, CancelToken::never()).await;
    Ok(code_reply(reply))
}

#[cfg(test)]
#[path = "assist_test.rs"]
mod tests;

//! Offline demo route. Simulates latency and returns canned text.

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::services::demo::canned_response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct DemoRequest {
    prompt: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// `POST /generate`: `{ prompt, type? }` → `{ success, result }`.
pub async fn generate(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<Value>) {
    let req: DemoRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            warn!(error = %e, "demo: unreadable request");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Failed to generate response" })),
            );
        }
    };

    state.sleeper.sleep(state.demo_delay).await;
    info!(kind = ?req.kind, "demo: canned response");

    let result = canned_response(&req.prompt, req.kind.as_deref());
    (StatusCode::OK, Json(json!({ "success": true, "result": result })))
}

//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON endpoints for the two assistant modes plus the offline demo stub and
//! a health check, under a single Axum router with permissive CORS and
//! request tracing.

pub mod assist;
pub mod demo;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(assist::chat))
        .route("/generate-code", post(assist::generate_code))
        .route("/generate", post(demo::generate))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

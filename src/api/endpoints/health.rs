//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub gemini_status: String,
}

/// `GET /health` — service liveness plus a completion-service probe.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let gemini_status = match ctx.gateway.probe().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {e}"),
    };

    Json(HealthResponse {
        status: "healthy",
        message: "HealthSync AI is running!",
        gemini_status,
    })
}

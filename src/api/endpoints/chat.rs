//! Chat endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::ChatEntry;
use crate::store::merge::add_chat_entry;

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub chat_id: u64,
}

/// `POST /chat` — answer a health question over the accumulated record.
///
/// The completion call runs against a snapshot of the record; the
/// exchange is then appended under the record lock. A degraded AI
/// response still comes back 200 — the gateway substitutes apology text.
pub async fn send(
    State(ctx): State<ApiContext>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("No message provided".into()));
    }

    let snapshot = ctx.repository.load()?;
    let response = ctx.gateway.chat(message, &snapshot).await;

    let chat_id = {
        let _guard = ctx.lock_record().await;
        let mut record = ctx.repository.load()?;
        let chat_id = add_chat_entry(&mut record, message, response.as_str());
        ctx.repository.save(&record)?;
        chat_id
    };

    Ok(Json(ChatResponse { response, chat_id }))
}

/// `GET /chat-history` — the full exchange history, oldest first.
pub async fn history(State(ctx): State<ApiContext>) -> Result<Json<Vec<ChatEntry>>, ApiError> {
    let record = ctx.repository.load()?;
    Ok(Json(record.chat_history))
}

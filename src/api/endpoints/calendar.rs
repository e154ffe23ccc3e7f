//! Calendar sync endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::calendar::publish;
use crate::models::PublishResult;
use crate::schedule::synthesize;

#[derive(Serialize)]
pub struct SyncResponse {
    pub message: &'static str,
    pub events_created: usize,
    pub calendar_result: PublishResult,
}

/// `POST /sync-calendar` — synthesize the medication schedule and push it
/// to the calendar provider.
///
/// A partial publish failure is still HTTP 200: the body carries
/// `success=false` plus the count of events that did get created.
pub async fn sync(State(ctx): State<ApiContext>) -> Result<Json<SyncResponse>, ApiError> {
    let record = ctx.repository.load()?;
    let today = chrono::Local::now().date_naive();

    let events = synthesize(&ctx.gateway, &record.medications, today).await;
    let result = publish(ctx.calendar.as_ref(), &events).await;

    let message = if result.success {
        "Calendar synced successfully"
    } else {
        "Calendar sync stopped partway through"
    };

    Ok(Json(SyncResponse {
        message,
        events_created: result.events_created,
        calendar_result: result,
    }))
}

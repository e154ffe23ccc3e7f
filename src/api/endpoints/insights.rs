//! Record-wide insight endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::gateway::HealthInsights;

/// `POST /health-insights` — generate insights over the whole record.
///
/// Never degrades to an HTTP error: the gateway substitutes its fixed
/// fallback structure when generation or parsing fails.
pub async fn generate(State(ctx): State<ApiContext>) -> Result<Json<HealthInsights>, ApiError> {
    let record = ctx.repository.load()?;
    Ok(Json(ctx.gateway.insights(&record).await))
}

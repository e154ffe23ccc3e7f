//! Record read endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::HealthRecord;

/// `GET /health-data` — the full aggregate record.
pub async fn health_data(State(ctx): State<ApiContext>) -> Result<Json<HealthRecord>, ApiError> {
    Ok(Json(ctx.repository.load()?))
}

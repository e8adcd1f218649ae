use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState, HealthResponse};

/// `GET /api/health`: 200 when the database answers, 500 otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    state
        .store()
        .ping()
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    let tracked_searches = state
        .store()
        .search_count()
        .await
        .map_err(|e| ApiError::database(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        tracked_searches,
    }))
}

//! Search tracking endpoints.
//!
//! Handlers only map HTTP/JSON; validation and the upsert live in
//! [`TrendingService`](crate::services::TrendingService).

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use crate::api::{ApiError, AppState};
use crate::models::{SearchRecord, SearchRequest};
use crate::services::TrendingError;

impl From<TrendingError> for ApiError {
    fn from(err: TrendingError) -> Self {
        match err {
            TrendingError::Validation(fields) => Self::ValidationError(fields),
            TrendingError::Conflict(msg) => Self::Conflict(msg),
            TrendingError::Database(msg) => Self::database(msg),
        }
    }
}

/// Records one search of a movie.
///
/// # Endpoint
/// `POST /api/movies/search`
///
/// # Request Body
/// `{"searchTerm": "...", "movieId": "...", "posterUrl": "..."}` where
/// `posterUrl` is optional.
///
/// # Response
/// The created or incremented [`SearchRecord`].
///
/// # Errors
/// 400 with per-field messages when `searchTerm` or `movieId` is missing or
/// blank, or when the body is not JSON.
pub async fn record_search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchRecord>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let record = state.trending().record_search(request).await?;
    Ok(Json(record))
}

/// Returns the five most searched movies, highest count first.
///
/// # Endpoint
/// `GET /api/movies/trending`
pub async fn trending(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SearchRecord>>, ApiError> {
    let records = state.trending().trending().await?;
    Ok(Json(records))
}

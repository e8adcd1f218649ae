//! Domain service for recording movie searches and reading the trending list.

use crate::db::StoreError;
use crate::models::{FieldErrors, SearchRecord, SearchRequest};
use thiserror::Error;

/// Errors specific to search tracking.
#[derive(Debug, Error)]
pub enum TrendingError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<StoreError> for TrendingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(msg) => Self::Conflict(msg),
            StoreError::Database(err) => Self::Database(err.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for TrendingError {
    fn from(err: sea_orm::DbErr) -> Self {
        StoreError::from(err).into()
    }
}

/// Domain service trait for search tracking.
#[async_trait::async_trait]
pub trait TrendingService: Send + Sync {
    /// Counts one search of `request.search_term`.
    ///
    /// Creates the record with a count of 1 the first time a term is seen;
    /// afterwards increments the count and refreshes `updated_at`, leaving
    /// `movie_id` and `poster_url` as they were first recorded.
    async fn record_search(&self, request: SearchRequest) -> Result<SearchRecord, TrendingError>;

    /// The most searched records, highest count first.
    async fn trending(&self) -> Result<Vec<SearchRecord>, TrendingError>;
}

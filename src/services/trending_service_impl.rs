//! `SeaORM` implementation of the `TrendingService` trait.

use crate::constants::limits::{MAX_UPSERT_ATTEMPTS, TRENDING_LIMIT};
use crate::db::{SearchRecordRepository, Store, StoreError};
use crate::models::{SearchRecord, SearchRequest, ValidSearch};
use crate::services::trending_service::{TrendingError, TrendingService};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{DatabaseTransaction, DbErr};
use tracing::{debug, info, warn};

pub struct SeaOrmTrendingService {
    store: Store,
}

impl SeaOrmTrendingService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Runs one upsert in its own transaction: commit on success, roll back on
    /// any failure.
    async fn upsert_once(&self, search: &ValidSearch) -> Result<SearchRecord, StoreError> {
        let txn = self.store.begin().await?;

        match Self::upsert_in(&txn, search).await {
            Ok(record) => {
                txn.commit().await?;
                Ok(record)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(error = %rollback_err, "Failed to roll back search upsert");
                }
                Err(err)
            }
        }
    }

    // The increment is the first statement so the transaction holds the write
    // lock before it reads anything.
    async fn upsert_in(
        txn: &DatabaseTransaction,
        search: &ValidSearch,
    ) -> Result<SearchRecord, StoreError> {
        let repo = SearchRecordRepository::new(txn);
        let now = Utc::now();

        if repo.increment(&search.search_term, now).await? {
            let record = repo
                .find_by_term(&search.search_term)
                .await?
                .ok_or_else(|| {
                    StoreError::Database(DbErr::RecordNotFound(format!(
                        "search record '{}' vanished after increment",
                        search.search_term
                    )))
                })?;

            debug!(
                search_term = %record.search_term,
                count = record.count,
                "Incremented search count"
            );
            return Ok(record);
        }

        let record = repo.insert(search, now).await?;
        info!(
            search_term = %record.search_term,
            movie_id = %record.movie_id,
            "Recorded first search"
        );
        Ok(record)
    }
}

#[async_trait]
impl TrendingService for SeaOrmTrendingService {
    async fn record_search(&self, request: SearchRequest) -> Result<SearchRecord, TrendingError> {
        let search = request.validate().map_err(TrendingError::Validation)?;

        let mut attempt = 1;
        loop {
            match self.upsert_once(&search).await {
                Ok(record) => return Ok(record),
                Err(StoreError::UniqueViolation(msg)) if attempt < MAX_UPSERT_ATTEMPTS => {
                    warn!(
                        search_term = %search.search_term,
                        attempt,
                        "Concurrent first search ({}), retrying as update",
                        msg
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn trending(&self) -> Result<Vec<SearchRecord>, TrendingError> {
        Ok(self.store.top_searches(TRENDING_LIMIT).await?)
    }
}

use crate::entities::{movie_searches, prelude::*};
use crate::models::{SearchRecord, ValidSearch};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr,
};
use thiserror::Error;

/// Store failures, with uniqueness violations split out so the caller can
/// retry an insert as an update.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::UniqueViolation(msg),
            _ => Self::Database(err),
        }
    }
}

impl From<movie_searches::Model> for SearchRecord {
    fn from(model: movie_searches::Model) -> Self {
        Self {
            id: model.id,
            search_term: model.search_term,
            movie_id: model.movie_id,
            count: model.count,
            poster_url: model.poster_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Queries over `movie_searches`. Borrows any connection so the same calls
/// run on the pool or inside a transaction.
pub struct SearchRecordRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SearchRecordRepository<'a, C> {
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Exact, case-sensitive lookup.
    pub async fn find_by_term(&self, term: &str) -> Result<Option<SearchRecord>, StoreError> {
        let model = MovieSearches::find()
            .filter(movie_searches::Column::SearchTerm.eq(term))
            .one(self.db)
            .await?;

        Ok(model.map(SearchRecord::from))
    }

    /// Highest counts first; equal counts keep creation order (lowest id first).
    pub async fn find_top(&self, limit: u64) -> Result<Vec<SearchRecord>, StoreError> {
        let models = MovieSearches::find()
            .order_by_desc(movie_searches::Column::Count)
            .order_by_asc(movie_searches::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(models.into_iter().map(SearchRecord::from).collect())
    }

    pub async fn insert(
        &self,
        search: &ValidSearch,
        now: DateTime<Utc>,
    ) -> Result<SearchRecord, StoreError> {
        let active_model = movie_searches::ActiveModel {
            search_term: Set(search.search_term.clone()),
            movie_id: Set(search.movie_id.clone()),
            count: Set(1),
            poster_url: Set(search.poster_url.clone()),
            created_at: Set(now),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        let model = active_model.insert(self.db).await?;
        Ok(model.into())
    }

    /// Adds one to the count of the record for `term` and refreshes
    /// `updated_at`, in a single statement. Returns whether a record existed.
    pub async fn increment(&self, term: &str, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let result = MovieSearches::update_many()
            .col_expr(
                movie_searches::Column::Count,
                Expr::col(movie_searches::Column::Count).add(1),
            )
            .col_expr(movie_searches::Column::UpdatedAt, Expr::value(now))
            .filter(movie_searches::Column::SearchTerm.eq(term))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_all(&self) -> Result<u64, StoreError> {
        use sea_orm::PaginatorTrait;

        Ok(MovieSearches::find().count(self.db).await?)
    }
}

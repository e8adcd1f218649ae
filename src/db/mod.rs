use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, Statement,
    TransactionTrait,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::SearchRecord;

pub mod migrator;
pub mod repositories;

pub use repositories::search_record::{SearchRecordRepository, StoreError};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = is_in_memory(db_url);

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Every pooled connection to `:memory:` is its own database, so the
        // pool is pinned to one connection that is never recycled.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
            (max_connections, min_connections)
        };
        opt.max_connections(max_connections)
            .min_connections(min_connections);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    pub async fn begin(&self) -> Result<DatabaseTransaction, StoreError> {
        Ok(self.conn.begin().await?)
    }

    #[must_use]
    pub const fn search_records(&self) -> SearchRecordRepository<'_, DatabaseConnection> {
        SearchRecordRepository::new(&self.conn)
    }

    pub async fn find_search(&self, term: &str) -> Result<Option<SearchRecord>, StoreError> {
        self.search_records().find_by_term(term).await
    }

    pub async fn top_searches(&self, limit: u64) -> Result<Vec<SearchRecord>, StoreError> {
        self.search_records().find_top(limit).await
    }

    pub async fn search_count(&self) -> Result<u64, StoreError> {
        self.search_records().count_all().await
    }
}

fn is_in_memory(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file?mode=memory"));
        assert!(!is_in_memory("sqlite:data/movie-trends.db"));
    }

    #[tokio::test]
    async fn in_memory_store_migrates_and_pings() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        store.ping().await.unwrap();
        assert_eq!(store.search_count().await.unwrap(), 0);
        assert!(store.top_searches(5).await.unwrap().is_empty());
        assert!(store.find_search("Inception").await.unwrap().is_none());
    }
}

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;

pub mod cors;
mod error;
mod movies;
mod observability;
mod system;
mod types;

pub use error::ApiError;
pub use types::*;

use crate::services::{SeaOrmTrendingService, TrendingService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub trending_service: Arc<dyn TrendingService>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn trending(&self) -> &dyn TrendingService {
        self.trending_service.as_ref()
    }
}

pub fn create_app_state(
    config: Config,
    store: Store,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let trending_service = Arc::new(SeaOrmTrendingService::new(store.clone()));

    Arc::new(AppState {
        config,
        store,
        trending_service,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(create_app_state(config, store, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    // CORS covers /api/** only.
    let api_router = Router::new()
        .route("/movies/search", post(movies::record_search))
        .route("/movies/trending", get(movies::trending))
        .route("/health", get(system::health))
        .layer(cors::cors_layer(&state.config.server));

    Router::new()
        .nest("/api", api_router)
        .route("/metrics", get(observability::get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state)
}

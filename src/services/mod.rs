pub mod trending_service;
pub use trending_service::{TrendingError, TrendingService};

pub mod trending_service_impl;
pub use trending_service_impl::SeaOrmTrendingService;

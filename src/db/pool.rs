//! Async PostgreSQL pool built on bb8 and diesel_async.

use std::time::Duration;

use bb8::Pool;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// bb8 pools are `Arc`-backed, so holders can derive `Clone` freely.
pub type AsyncDbPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Builds the pool from the `[database]` section.
pub async fn establish_async_connection_pool(config: &DatabaseConfig) -> AppResult<AsyncDbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url.as_str());

    Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(Duration::from_secs(config.connection_timeout))
        .build(manager)
        .await
        .map_err(|e| AppError::ConnectionPool {
            source: anyhow::Error::new(e),
        })
}

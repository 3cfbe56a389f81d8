//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::config::{JwtConfig, Settings};
use crate::db::AsyncDbPool;
use crate::logger::LogLevelHandle;
use crate::repositories::{Entity, Repository};
use crate::services::Services;
use crate::storage::BlobStorage;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since the pool, storage handle and services are
/// `Arc`-backed.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Direct access to the database connection pool
    pub db_pool: AsyncDbPool,
    /// JWT configuration for token generation and validation
    pub jwt_config: JwtConfig,
    /// Reload handle of the global subscriber; absent when logging was set
    /// up by someone else (tests)
    pub log_level: Option<LogLevelHandle>,
}

impl AppState {
    pub fn new(
        pool: AsyncDbPool,
        storage: Arc<dyn BlobStorage>,
        settings: &Settings,
        log_level: Option<LogLevelHandle>,
    ) -> Self {
        let services = Services::new(pool.clone(), storage, settings);
        Self {
            services,
            db_pool: pool,
            jwt_config: settings.jwt.clone(),
            log_level,
        }
    }

    /// Generic repository for `E` over the shared pool.
    pub fn repository<E: Entity>(&self) -> Repository<E> {
        Repository::new(self.db_pool.clone())
    }
}

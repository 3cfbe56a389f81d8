//! Service layer for business logic operations.
//!
//! Services encapsulate the workflows that span more than one repository
//! call; plain CRUD goes straight from handlers to
//! [`Repository`](crate::repositories::Repository).

mod approval_service;
mod auth_service;
mod media_service;

pub use approval_service::{ApprovalService, ApprovedDiscovery};
pub use auth_service::{AuthService, AuthSession, Registration};
pub use media_service::{MediaService, Upload};

use std::sync::Arc;

use crate::config::Settings;
use crate::db::AsyncDbPool;
use crate::repositories::Repository;
use crate::storage::BlobStorage;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since the pool and storage handle are `Arc`-backed.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub approvals: ApprovalService,
    pub media: MediaService,
}

impl Services {
    pub fn new(pool: AsyncDbPool, storage: Arc<dyn BlobStorage>, settings: &Settings) -> Self {
        Self {
            auth: AuthService::new(Repository::new(pool.clone()), settings.jwt.clone()),
            approvals: ApprovalService::new(pool),
            media: MediaService::new(storage, &settings.media),
        }
    }
}

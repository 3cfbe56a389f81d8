//! Media object storage.
//!
//! Uploads go through the [`BlobStorage`] trait; the configured backend is
//! either the local filesystem or an Azure-style blob endpoint.

mod blob;
mod local;

pub use blob::HttpBlobStorage;
pub use local::LocalStorage;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{MediaConfig, StorageBackend};
use crate::error::AppResult;

/// What an uploaded file illustrates; selects the folder or container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Avatar,
    Celestial,
    Article,
    Event,
}

impl MediaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCategory::Avatar => "avatar",
            MediaCategory::Celestial => "celestial",
            MediaCategory::Article => "article",
            MediaCategory::Event => "event",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object to store: final object name plus payload.
#[derive(Debug, Clone)]
pub struct MediaObject {
    pub category: MediaCategory,
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Stores `object` and returns its public URL.
    ///
    /// # Errors
    /// `AppError::BadGateway` when the backend rejects or cannot be reached.
    async fn put(&self, object: MediaObject) -> AppResult<String>;

    fn backend(&self) -> &'static str;
}

/// Builds the backend selected by `media.backend`.
pub fn build_storage(config: &MediaConfig) -> AppResult<Arc<dyn BlobStorage>> {
    Ok(match config.backend {
        StorageBackend::Local => Arc::new(LocalStorage::new(&config.local)),
        StorageBackend::Blob => Arc::new(HttpBlobStorage::new(&config.blob)?),
    })
}

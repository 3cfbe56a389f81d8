//! Upload rules in front of the configured [`BlobStorage`] backend.

use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::config::MediaConfig;
use crate::error::{AppError, AppResult};
use crate::storage::{BlobStorage, MediaCategory, MediaObject};

/// A file as received from the multipart form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Clone)]
pub struct MediaService {
    storage: Arc<dyn BlobStorage>,
    allowed_extensions: Vec<String>,
    max_upload_bytes: usize,
}

impl MediaService {
    pub fn new(storage: Arc<dyn BlobStorage>, config: &MediaConfig) -> Self {
        Self {
            storage,
            allowed_extensions: config.allowed_extensions.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.storage.backend()
    }

    /// Validates `upload` and stores it under a fresh UUID name.
    ///
    /// # Errors
    /// - `BadRequest` for an empty or oversized file, a disallowed extension,
    ///   or a non-image content type
    /// - `BadGateway` when the backend fails
    pub async fn upload(&self, category: MediaCategory, upload: Upload) -> AppResult<String> {
        let extension = self.check(&upload)?;
        let name = format!("{}.{}", Uuid::new_v4(), extension);
        let content_type = upload
            .content_type
            .unwrap_or_else(|| format!("image/{extension}"));

        let url = self
            .storage
            .put(MediaObject {
                category,
                name,
                content_type,
                bytes: upload.bytes,
            })
            .await?;

        info!(%category, backend = self.storage.backend(), %url, "Media uploaded");
        Ok(url)
    }

    /// Returns the normalised (lower-case) extension of an acceptable upload.
    fn check(&self, upload: &Upload) -> AppResult<String> {
        if upload.bytes.is_empty() {
            return Err(AppError::bad_request("Uploaded file is empty"));
        }
        if upload.bytes.len() > self.max_upload_bytes {
            return Err(AppError::bad_request(format!(
                "Uploaded file exceeds {} bytes",
                self.max_upload_bytes
            )));
        }

        let extension = Path::new(&upload.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| self.allowed_extensions.iter().any(|allowed| allowed == ext))
            .ok_or_else(|| {
                AppError::bad_request(format!(
                    "File extension not allowed; expected one of: {}",
                    self.allowed_extensions.join(", ")
                ))
            })?;

        if let Some(content_type) = upload
            .content_type
            .as_deref()
            .filter(|ct| !ct.starts_with("image/"))
        {
            return Err(AppError::bad_request(format!(
                "Content type {content_type} is not an image"
            )));
        }

        Ok(extension)
    }
}

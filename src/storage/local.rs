use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::{BlobStorage, MediaObject};
use crate::config::LocalStorageConfig;
use crate::error::{AppError, AppResult};

/// Writes objects to `<root>/<category>/<name>`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(config: &LocalStorageConfig) -> Self {
        Self {
            root: config.root.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BlobStorage for LocalStorage {
    async fn put(&self, object: MediaObject) -> AppResult<String> {
        let dir = self.root.join(object.category.as_str());
        let path = dir.join(&object.name);

        let write = async {
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(&path, &object.bytes).await
        };
        write.await.map_err(|e| AppError::BadGateway {
            message: format!("failed to write {}", path.display()),
            source: anyhow::Error::new(e),
        })?;

        debug!(path = %path.display(), size = object.bytes.len(), "Stored media locally");
        Ok(format!(
            "{}/{}/{}",
            self.public_base_url, object.category, object.name
        ))
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

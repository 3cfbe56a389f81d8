use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use super::{BlobStorage, MediaCategory, MediaObject};
use crate::config::{BlobStorageConfig, MediaContainers};
use crate::error::{AppError, AppResult};

/// Azure Blob REST uploads: one `PUT` per object, authorised by an
/// optional SAS query string.
#[derive(Debug, Clone)]
pub struct HttpBlobStorage {
    client: reqwest::Client,
    endpoint: String,
    sas_token: Option<String>,
    containers: MediaContainers,
}

impl HttpBlobStorage {
    pub fn new(config: &BlobStorageConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| AppError::Configuration {
                key: "media.blob".to_string(),
                source: anyhow::Error::new(e),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            sas_token: config
                .sas_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
            containers: config.containers.clone(),
        })
    }

    fn container(&self, category: MediaCategory) -> &str {
        match category {
            MediaCategory::Avatar => &self.containers.avatar,
            MediaCategory::Celestial => &self.containers.celestial,
            MediaCategory::Article => &self.containers.article,
            MediaCategory::Event => &self.containers.event,
        }
    }

    /// Public URL of the object, without credentials.
    pub fn object_url(&self, category: MediaCategory, name: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.container(category), name)
    }

    fn upload_url(&self, category: MediaCategory, name: &str) -> String {
        let url = self.object_url(category, name);
        match &self.sas_token {
            Some(sas) => format!("{url}?{sas}"),
            None => url,
        }
    }
}

#[async_trait]
impl BlobStorage for HttpBlobStorage {
    async fn put(&self, object: MediaObject) -> AppResult<String> {
        let size = object.bytes.len();
        let response = self
            .client
            .put(self.upload_url(object.category, &object.name))
            .header("x-ms-blob-type", "BlockBlob")
            .header(CONTENT_TYPE, object.content_type.as_str())
            .body(object.bytes)
            .send()
            .await
            .map_err(|e| AppError::BadGateway {
                message: "blob storage unreachable".to_string(),
                source: anyhow::Error::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, container = self.container(object.category), "Blob upload rejected");
            return Err(AppError::BadGateway {
                message: format!("blob storage answered {status}"),
                source: anyhow::anyhow!("upload of {} failed: {body}", object.name),
            });
        }

        debug!(name = %object.name, size, "Uploaded media blob");
        Ok(self.object_url(object.category, &object.name))
    }

    fn backend(&self) -> &'static str {
        "blob"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::Bytes;
    use axum::extract::{Path, RawQuery, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::put;

    use super::*;

    fn config(endpoint: &str, sas: Option<&str>) -> BlobStorageConfig {
        BlobStorageConfig {
            endpoint: endpoint.to_string(),
            sas_token: sas.map(str::to_string),
            containers: MediaContainers::default(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn urls_use_category_container_and_sas() {
        let storage =
            HttpBlobStorage::new(&config("https://acct.blob.core.windows.net/", Some("sv=1&sig=x")))
                .unwrap();

        assert_eq!(
            storage.object_url(MediaCategory::Event, "e.png"),
            "https://acct.blob.core.windows.net/event-images/e.png"
        );
        assert_eq!(
            storage.upload_url(MediaCategory::Avatar, "a.png"),
            "https://acct.blob.core.windows.net/avatars/a.png?sv=1&sig=x"
        );
    }

    #[test]
    fn blank_sas_is_dropped() {
        let storage = HttpBlobStorage::new(&config("http://blob.local", Some("  "))).unwrap();

        assert_eq!(
            storage.upload_url(MediaCategory::Article, "x.gif"),
            "http://blob.local/article-images/x.gif"
        );
    }

    #[derive(Clone, Default)]
    struct Seen(Arc<Mutex<Vec<(String, Option<String>, Option<String>, usize)>>>);

    async fn spawn_blob_server(status: StatusCode) -> (String, Seen) {
        let seen = Seen::default();
        let app = Router::new()
            .route(
                "/{container}/{name}",
                put(
                    move |State(seen): State<Seen>,
                          Path((container, name)): Path<(String, String)>,
                          RawQuery(query): RawQuery,
                          headers: HeaderMap,
                          body: Bytes| async move {
                        let blob_type = headers
                            .get("x-ms-blob-type")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        seen.0.lock().unwrap().push((
                            format!("{container}/{name}"),
                            query,
                            blob_type,
                            body.len(),
                        ));
                        status
                    },
                ),
            )
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), seen)
    }

    fn object() -> MediaObject {
        MediaObject {
            category: MediaCategory::Celestial,
            name: "m31.webp".to_string(),
            content_type: "image/webp".to_string(),
            bytes: Bytes::from_static(b"RIFF0000WEBP"),
        }
    }

    #[tokio::test]
    async fn put_uploads_block_blob_with_sas() {
        let (endpoint, seen) = spawn_blob_server(StatusCode::CREATED).await;
        let storage = HttpBlobStorage::new(&config(&endpoint, Some("sig=abc"))).unwrap();

        let url = storage.put(object()).await.unwrap();

        assert_eq!(url, format!("{endpoint}/celestial-images/m31.webp"));
        let seen = seen.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "celestial-images/m31.webp");
        assert_eq!(seen[0].1.as_deref(), Some("sig=abc"));
        assert_eq!(seen[0].2.as_deref(), Some("BlockBlob"));
        assert_eq!(seen[0].3, 12);
    }

    #[tokio::test]
    async fn rejected_upload_is_bad_gateway() {
        let (endpoint, _seen) = spawn_blob_server(StatusCode::FORBIDDEN).await;
        let storage = HttpBlobStorage::new(&config(&endpoint, None)).unwrap();

        let result = storage.put(object()).await;

        assert!(matches!(result, Err(AppError::BadGateway { .. })));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_bad_gateway() {
        let storage = HttpBlobStorage::new(&config("http://127.0.0.1:9", None)).unwrap();

        let result = storage.put(object()).await;

        assert!(matches!(result, Err(AppError::BadGateway { .. })));
    }
}

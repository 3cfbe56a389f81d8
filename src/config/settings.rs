//! Configuration structures loaded from TOML files and `ASTRO_*` variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::environment::Environment;
use crate::logger::LoggerConfig;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "astro-rs".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_keep_alive_timeout() -> u64 {
    75
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_expiration_hours() -> i64 {
    24
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_local_root() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:3000/media".to_string()
}

fn default_blob_timeout() -> u64 {
    30
}

// ============================================================================
// Application
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,

    /// Filled in by the loader from `ASTRO_APP_ENV`
    #[serde(default)]
    pub environment: Environment,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
            environment: Environment::default(),
        }
    }
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Keep-alive timeout in seconds
    #[serde(default = "default_keep_alive_timeout")]
    pub keep_alive_timeout: u64,
}

impl ServerConfig {
    /// "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            keep_alive_timeout: default_keep_alive_timeout(),
        }
    }
}

// ============================================================================
// Database
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Run pending migrations before the server starts accepting requests
    #[serde(default)]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
            auto_migrate: false,
        }
    }
}

// ============================================================================
// JWT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing key; supply it through `ASTRO_JWT__SECRET`
    #[serde(default)]
    pub secret: String,

    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiration_hours: default_expiration_hours(),
        }
    }
}

// ============================================================================
// Media
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    Blob,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Lower-case extensions without the dot
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    #[serde(default)]
    pub local: LocalStorageConfig,

    #[serde(default)]
    pub blob: BlobStorageConfig,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
            local: LocalStorageConfig::default(),
            blob: BlobStorageConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    #[serde(default = "default_local_root")]
    pub root: PathBuf,

    /// Prefix of the URLs handed back to clients; files are served from `/media`
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root: default_local_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobStorageConfig {
    /// Account endpoint, e.g. `https://account.blob.core.windows.net`
    #[serde(default)]
    pub endpoint: String,

    /// Shared access signature appended to every PUT, without the leading `?`
    #[serde(default)]
    pub sas_token: Option<String>,

    #[serde(default)]
    pub containers: MediaContainers,

    #[serde(default = "default_blob_timeout")]
    pub timeout_secs: u64,
}

impl Default for BlobStorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            sas_token: None,
            containers: MediaContainers::default(),
            timeout_secs: default_blob_timeout(),
        }
    }
}

/// Container name per upload category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaContainers {
    pub avatar: String,
    pub celestial: String,
    pub article: String,
    pub event: String,
}

impl Default for MediaContainers {
    fn default() -> Self {
        Self {
            avatar: "avatars".to_string(),
            celestial: "celestial-images".to_string(),
            article: "article-images".to_string(),
            event: "event-images".to_string(),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub logger: LoggerConfig,

    #[serde(default)]
    pub media: MediaConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_server_config() -> impl Strategy<Value = ServerConfig> {
        (
            prop_oneof![Just("127.0.0.1".to_string()), Just("0.0.0.0".to_string())],
            1u16..=65535,
            1u64..=300,
            1u64..=600,
        )
            .prop_map(|(host, port, request_timeout, keep_alive_timeout)| ServerConfig {
                host,
                port,
                request_timeout,
                keep_alive_timeout,
            })
    }

    fn arb_media_config() -> impl Strategy<Value = MediaConfig> {
        (
            prop_oneof![Just(StorageBackend::Local), Just(StorageBackend::Blob)],
            1usize..=50 * 1024 * 1024,
            proptest::collection::vec("[a-z]{3,4}", 1..5),
            proptest::option::of("[a-z0-9=&]{8,32}"),
        )
            .prop_map(|(backend, max_upload_bytes, allowed_extensions, sas_token)| {
                MediaConfig {
                    backend,
                    max_upload_bytes,
                    allowed_extensions,
                    local: LocalStorageConfig::default(),
                    blob: BlobStorageConfig {
                        endpoint: "https://example.blob.core.windows.net".to_string(),
                        sas_token,
                        ..Default::default()
                    },
                }
            })
    }

    proptest! {
        #[test]
        fn prop_settings_round_trip_serialization(
            server in arb_server_config(),
            media in arb_media_config(),
        ) {
            let settings = Settings {
                server,
                media,
                ..Default::default()
            };
            let json = serde_json::to_string(&settings).unwrap();
            let parsed: Settings = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(parsed, settings);
        }
    }

    #[test]
    fn server_address_joins_host_and_port() {
        let server = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(server.address(), "0.0.0.0:8080");
    }

    #[test]
    fn media_defaults_accept_common_image_types() {
        let media = MediaConfig::default();
        assert_eq!(media.backend, StorageBackend::Local);
        assert_eq!(
            media.allowed_extensions,
            vec!["jpg", "jpeg", "png", "gif", "webp"]
        );
        assert_eq!(media.blob.containers.celestial, "celestial-images");
    }

    #[test]
    fn partial_document_fills_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{"server": {"port": 9000}, "media": {"backend": "blob"}}"#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.media.backend, StorageBackend::Blob);
        assert_eq!(settings.jwt.expiration_hours, 24);
        assert_eq!(settings.logger.level, "info");
    }
}

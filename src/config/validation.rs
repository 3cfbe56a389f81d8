//! Per-section validation run by the loader after deserialisation.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, JwtConfig, MediaConfig, ServerConfig, Settings, StorageBackend,
};
use crate::logger::LoggerConfig;

const MIN_JWT_SECRET_LEN: usize = 32;

const VALID_DATABASE_SCHEMES: &[&str] = &["postgres://", "postgresql://"];

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host address cannot be empty.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.keep_alive_timeout == 0 {
            return Err(ConfigError::validation(
                "server.keep_alive_timeout",
                "Keep-alive timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Set ASTRO_DATABASE__URL or database.url.",
            ));
        }

        if !VALID_DATABASE_SCHEMES
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
        {
            return Err(ConfigError::validation(
                "database.url",
                "Expected a PostgreSQL URL: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl JwtConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::validation(
                "jwt.secret",
                "JWT secret cannot be empty. Set ASTRO_JWT__SECRET.",
            ));
        }

        if self.secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::validation(
                "jwt.secret",
                format!("JWT secret must be at least {MIN_JWT_SECRET_LEN} characters."),
            ));
        }

        if self.expiration_hours <= 0 {
            return Err(ConfigError::validation(
                "jwt.expiration_hours",
                "Token expiration must be positive.",
            ));
        }

        Ok(())
    }
}

impl MediaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::validation(
                "media.max_upload_bytes",
                "Upload limit must be greater than 0 bytes.",
            ));
        }

        if self.allowed_extensions.is_empty() {
            return Err(ConfigError::validation(
                "media.allowed_extensions",
                "At least one extension must be allowed.",
            ));
        }

        if let Some(bad) = self
            .allowed_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.') || ext.to_lowercase() != **ext)
        {
            return Err(ConfigError::validation(
                "media.allowed_extensions",
                format!("Extension '{bad}' must be lower-case and written without a dot."),
            ));
        }

        match self.backend {
            StorageBackend::Local => {
                if self.local.root.as_os_str().is_empty() {
                    return Err(ConfigError::validation(
                        "media.local.root",
                        "Local storage root cannot be empty.",
                    ));
                }
                if !is_http_url(&self.local.public_base_url) {
                    return Err(ConfigError::validation(
                        "media.local.public_base_url",
                        "Public base URL must start with http:// or https://.",
                    ));
                }
            }
            StorageBackend::Blob => {
                if !is_http_url(&self.blob.endpoint) {
                    return Err(ConfigError::validation(
                        "media.blob.endpoint",
                        "Blob endpoint must start with http:// or https://.",
                    ));
                }
                if self
                    .blob
                    .sas_token
                    .as_deref()
                    .is_some_and(|token| token.starts_with('?'))
                {
                    return Err(ConfigError::validation(
                        "media.blob.sas_token",
                        "SAS token must not start with '?'.",
                    ));
                }
                if self.blob.timeout_secs == 0 {
                    return Err(ConfigError::validation(
                        "media.blob.timeout_secs",
                        "Blob timeout must be greater than 0 seconds.",
                    ));
                }
            }
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn validate_logger(logger: &LoggerConfig) -> Result<(), ConfigError> {
    logger
        .validate()
        .map_err(|e| ConfigError::validation("logger", e.to_string()))
}

impl Settings {
    /// Validates every section, returning the first failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.jwt.validate()?;
        validate_logger(&self.logger)?;
        self.media.validate()?;
        Ok(())
    }
}

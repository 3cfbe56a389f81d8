//! Configuration management.
//!
//! Settings are layered from TOML files under `config/` and `ASTRO_*`
//! environment variables, then validated section by section.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    BlobStorageConfig, DatabaseConfig, JwtConfig, LocalStorageConfig, MediaConfig,
    MediaContainers, ServerConfig, Settings, StorageBackend,
};

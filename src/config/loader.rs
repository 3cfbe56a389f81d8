//! Layered configuration loading.
//!
//! Sources, lowest priority first:
//! 1. `default.toml` (required)
//! 2. `{environment}.toml`
//! 3. `local.toml`
//! 4. `ASTRO_*` environment variables, `__` separating nested keys
//!
//! `ASTRO_CONFIG_FILE` replaces steps 1-3 with a single file.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "ASTRO_CONFIG_DIR";
const CONFIG_FILE_ENV: &str = "ASTRO_CONFIG_FILE";
const DEFAULT_CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "ASTRO";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Reads `ASTRO_CONFIG_DIR`, `ASTRO_CONFIG_FILE` and `ASTRO_APP_ENV`.
    ///
    /// Fails when both the directory and the file variable are set.
    pub fn new() -> Result<Self, ConfigError> {
        let dir_var = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if dir_var.is_some() && config_file.is_some() {
            return Err(ConfigError::conflicting_sources(format!(
                "{CONFIG_DIR_ENV} and {CONFIG_FILE_ENV} cannot both be set"
            )));
        }

        Ok(Self {
            config_dir: dir_var
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Loader reading a single file, used by `--config`.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Overrides the environment picked up from `ASTRO_APP_ENV`.
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Builds, deserialises and validates the settings.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings = self.load_unvalidated()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Same as [`load`](Self::load) without validation, so CLI overrides can
    /// be applied before the final check.
    pub fn load_unvalidated(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let mut settings: Settings = config
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        settings.application.environment = self.environment;
        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match &self.config_file {
            Some(file) => Self::add_file_source(builder, file, true)?,
            None => {
                let builder =
                    Self::add_file_source(builder, &self.config_dir.join("default.toml"), true)?;
                let env_file = self
                    .config_dir
                    .join(format!("{}.toml", self.environment.as_str()));
                let builder = Self::add_file_source(builder, &env_file, false)?;
                Self::add_file_source(builder, &self.config_dir.join("local.toml"), false)?
            }
        };

        // ASTRO_DATABASE__URL -> database.url
        let builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        );

        builder.build().map_err(ConfigError::from)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(path.display().to_string()));
        }
        let name = path
            .to_str()
            .ok_or_else(|| ConfigError::ParseError(format!("non UTF-8 path: {}", path.display())))?;
        Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::StorageBackend;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests mutate process-wide env vars
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const BASE: &str = r#"
[application]
name = "astro-test"

[server]
port = 3000

[database]
url = "postgres://localhost/astro"

[jwt]
secret = "0123456789abcdef0123456789abcdef"
"#;

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    struct EnvGuard {
        restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            let mut guard = Self {
                restore: Vec::new(),
            };
            for key in [CONFIG_DIR_ENV, CONFIG_FILE_ENV, AppEnvironment::ENV_VAR] {
                guard.remove(key);
            }
            guard
        }

        fn set(&mut self, key: &str, value: &str) {
            self.restore.push((key.to_string(), std::env::var(key).ok()));
            unsafe { std::env::set_var(key, value) };
        }

        fn remove(&mut self, key: &str) {
            self.restore.push((key.to_string(), std::env::var(key).ok()));
            unsafe { std::env::remove_var(key) };
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.restore.iter().rev() {
                unsafe {
                    match value {
                        Some(v) => std::env::set_var(key, v),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    #[test]
    fn defaults_to_config_directory_and_development() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();

        let loader = ConfigLoader::new().unwrap();
        assert_eq!(loader.config_dir, PathBuf::from("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn dir_and_file_are_mutually_exclusive() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set(CONFIG_DIR_ENV, "/etc/astro");
        env.set(CONFIG_FILE_ENV, "/etc/astro/astro.toml");

        match ConfigLoader::new() {
            Err(ConfigError::ConflictingSources(msg)) => {
                assert!(msg.contains("ASTRO_CONFIG_DIR"));
                assert!(msg.contains("ASTRO_CONFIG_FILE"));
            }
            other => panic!("expected ConflictingSources, got {other:?}"),
        }
    }

    #[test]
    fn missing_default_toml_is_reported() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, dir.path().to_str().unwrap());

        let err = ConfigLoader::new().unwrap().load().unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(path) if path.contains("default.toml")));
    }

    #[test]
    fn environment_file_overrides_default() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let dir = setup_config_dir(&[
            ("default.toml", BASE),
            (
                "production.toml",
                "[server]\nhost = \"0.0.0.0\"\nport = 8080\n\n[media]\nbackend = \"blob\"\n\n[media.blob]\nendpoint = \"https://astro.blob.core.windows.net\"\n",
            ),
        ]);
        env.set(CONFIG_DIR_ENV, dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "production");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.media.backend, StorageBackend::Blob);
        assert_eq!(settings.application.name, "astro-test");
        assert_eq!(settings.application.environment, AppEnvironment::Production);
    }

    #[test]
    fn local_file_overrides_environment_file() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let dir = setup_config_dir(&[
            ("default.toml", BASE),
            ("development.toml", "[server]\nport = 4000\n"),
            ("local.toml", "[server]\nport = 5000\n"),
        ]);
        env.set(CONFIG_DIR_ENV, dir.path().to_str().unwrap());

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.server.port, 5000);
    }

    #[test]
    fn env_vars_take_precedence() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let dir = setup_config_dir(&[("default.toml", BASE)]);
        env.set(CONFIG_DIR_ENV, dir.path().to_str().unwrap());
        env.set("ASTRO_SERVER__PORT", "9090");
        env.set("ASTRO_MEDIA__MAX_UPLOAD_BYTES", "2048");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.media.max_upload_bytes, 2048);
    }

    #[test]
    fn single_file_mode_skips_layering() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let dir = setup_config_dir(&[("astro.toml", BASE)]);
        let file = dir.path().join("astro.toml");
        env.set(CONFIG_FILE_ENV, file.to_str().unwrap());

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.database.url, "postgres://localhost/astro");
    }

    #[test]
    fn invalid_settings_fail_validation() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();
        let dir = setup_config_dir(&[("astro.toml", "[server]\nport = 3000\n")]);

        let loader = ConfigLoader::from_file(dir.path().join("astro.toml"));
        assert!(matches!(
            loader.load(),
            Err(ConfigError::ValidationError { field, .. }) if field == "database.url"
        ));
        assert!(loader.load_unvalidated().is_ok());
    }
}

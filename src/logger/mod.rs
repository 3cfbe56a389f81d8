//! Logging setup on top of `tracing-subscriber`.
//!
//! - console output with ANSI colours when attached to a terminal
//! - optional file output (full, compact or JSON) through a size-rotating writer
//! - a reloadable `EnvFilter` so the level can change while the server runs

pub mod config;
pub mod error;
pub(crate) mod writer;

pub use config::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};
use writer::RotatingFileWriter;

type FilteredRegistry = tracing_subscriber::layer::Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync + 'static>;

/// Handle for changing the active log filter at runtime.
#[derive(Clone)]
pub struct LogLevelHandle {
    inner: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    /// Replaces the active filter with `level` (a level or directive list).
    pub fn set_level(&self, level: &str) -> Result<(), LoggerError> {
        config::validate_level(level)?;
        let filter = EnvFilter::try_new(level).map_err(|e| LoggerError::reload(e.to_string()))?;
        self.inner
            .reload(filter)
            .map_err(|e| LoggerError::reload(e.to_string()))?;
        tracing::info!(level = %level, "Log level changed");
        Ok(())
    }

    /// Current filter rendered back as a directive string.
    pub fn current_level(&self) -> Option<String> {
        self.inner.with_current(|filter| filter.to_string()).ok()
    }
}

/// Installs the global subscriber described by `config`.
pub fn init_logger(config: &LoggerConfig) -> Result<LogLevelHandle, LoggerError> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(filter);

    // File layer goes first so span fields formatted for the console never
    // carry ANSI escapes into the file.
    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.file.enabled {
        layers.push(file_layer(&config.file)?);
    }
    if config.console.enabled {
        layers.push(console_layer(&config.console));
    }

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(layers)
        .try_init()
        .map_err(|e| LoggerError::config(e.to_string()))?;

    Ok(LogLevelHandle { inner: handle })
}

fn console_layer(config: &ConsoleConfig) -> BoxedLayer {
    let use_ansi = config.colored && std::io::stdout().is_terminal();
    fmt::layer()
        .with_ansi(use_ansi)
        .with_target(true)
        .with_level(true)
        .boxed()
}

fn file_layer(config: &FileConfig) -> Result<BoxedLayer, LoggerError> {
    let writer = RotatingFileWriter::new(config)?;
    let base = fmt::layer().with_ansi(false).with_target(true).with_writer(writer);

    let layer = match config.format {
        LogFormat::Full => base.boxed(),
        LogFormat::Compact => base.compact().boxed(),
        LogFormat::Json => base.json().boxed(),
    };
    Ok(layer)
}

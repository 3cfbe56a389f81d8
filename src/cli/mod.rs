//! Command-line entry: argument parsing, configuration merging and
//! command dispatch.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};

use anyhow::Context;

use crate::config::Settings;

/// Loads the layered configuration with the command line applied on top.
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    ConfigurationMerger::from_cli(cli)
        .and_then(|merger| merger.load(cli))
        .context("Failed to load configuration")
}

//! Applies CLI overrides on top of the file and environment configuration.
//!
//! Precedence, highest first: serve flags, global flags, `ASTRO_*`
//! variables, TOML files.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

pub struct ConfigurationMerger {
    loader: ConfigLoader,
}

impl ConfigurationMerger {
    /// Picks the loader from `--config` and `--env`.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match &cli.config {
            Some(path) => ConfigLoader::from_file(path.clone()),
            None => ConfigLoader::new()?,
        };
        let loader = match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        };
        Ok(Self { loader })
    }

    /// Loads the configuration, applies the overrides, then validates.
    pub fn load(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut settings = self.loader.load_unvalidated()?;
        apply_overrides(&mut settings, cli);
        settings.validate()?;
        Ok(settings)
    }
}

pub fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if cli.verbose {
        settings.logger.level = "debug".to_string();
    } else if cli.quiet {
        settings.logger.level = "error".to_string();
    }

    if let Some(Commands::Serve {
        host,
        port,
        log_level,
        ..
    }) = &cli.command
    {
        if let Some(host) = host {
            settings.server.host = host.clone();
        }
        if let Some(port) = port {
            settings.server.port = *port;
        }
        if let Some(level) = log_level {
            settings.logger.level = level.as_str().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("astro-rs").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn serve_flags_override_file_values() {
        let mut settings = Settings::default();
        settings.logger.level = "warn".to_string();

        apply_overrides(
            &mut settings,
            &parse(&["-v", "serve", "--port", "9000", "--log-level", "trace"]),
        );

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.logger.level, "trace");
    }

    #[test]
    fn quiet_lowers_level_without_serve_flags() {
        let mut settings = Settings::default();
        apply_overrides(&mut settings, &parse(&["-q", "migrate"]));
        assert_eq!(settings.logger.level, "error");
    }

    #[test]
    fn loads_single_file_with_cli_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[database]
url = "postgres://localhost/astro"

[jwt]
secret = "0123456789abcdef0123456789abcdef"
expiration_hours = 12
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let cli = parse(&["--config", path, "--env", "staging", "serve", "--host", "0.0.0.0"]);
        let settings = ConfigurationMerger::from_cli(&cli)
            .unwrap()
            .load(&cli)
            .unwrap();

        assert_eq!(settings.jwt.expiration_hours, 12);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(
            settings.application.environment,
            crate::config::Environment::Staging
        );
    }
}

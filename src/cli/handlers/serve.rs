//! `serve`: run the HTTP server, or only report what it would do.

use crate::config::Settings;
use crate::error::AppResult;
use crate::logger::LogLevelHandle;
use crate::server::Server;

pub struct ServeCommandHandler {
    settings: Settings,
}

impl ServeCommandHandler {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub async fn execute(
        self,
        dry_run: bool,
        log_level: Option<LogLevelHandle>,
    ) -> anyhow::Result<()> {
        if dry_run {
            self.dry_run()?;
            return Ok(());
        }
        Server::new(self.settings, log_level).run().await
    }

    /// Validates the settings and prints the effective values.
    pub fn dry_run(&self) -> AppResult<()> {
        self.settings.validate()?;

        let settings = &self.settings;
        println!("✓ Configuration is valid");
        println!("  environment: {}", settings.application.environment);
        println!("  bind address: {}", settings.server.address());
        println!(
            "  database pool: {}..{} connections",
            settings.database.min_connections, settings.database.max_connections
        );
        println!("  auto migrate: {}", settings.database.auto_migrate);
        println!("  media backend: {:?}", settings.media.backend);
        println!("  log level: {}", settings.logger.level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/astro".to_string();
        settings.jwt.secret = "0123456789abcdef0123456789abcdef".to_string();
        settings
    }

    #[tokio::test]
    async fn dry_run_accepts_valid_settings() {
        let handler = ServeCommandHandler::new(valid_settings());
        assert!(handler.execute(true, None).await.is_ok());
    }

    #[tokio::test]
    async fn dry_run_rejects_short_jwt_secret() {
        let mut settings = valid_settings();
        settings.jwt.secret = "short".to_string();

        let handler = ServeCommandHandler::new(settings);

        assert!(handler.execute(true, None).await.is_err());
    }
}

//! HTTP server lifecycle: startup, optional migrations, graceful shutdown.

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::Settings;
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::logger::LogLevelHandle;
use crate::state::AppState;
use crate::storage::build_storage;

pub struct Server {
    settings: Settings,
    log_level: Option<LogLevelHandle>,
}

impl Server {
    pub fn new(settings: Settings, log_level: Option<LogLevelHandle>) -> Self {
        Self {
            settings,
            log_level,
        }
    }

    /// Starts the server and runs until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    /// - Migration or pool initialisation failures
    /// - Storage backend construction failures
    /// - Address binding errors
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = &self.settings;
        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            environment = %settings.application.environment,
            "Application starting"
        );
        tracing::info!(
            max_connections = settings.database.max_connections,
            min_connections = settings.database.min_connections,
            connection_timeout = settings.database.connection_timeout,
            auto_migrate = settings.database.auto_migrate,
            "Database configuration loaded"
        );
        tracing::info!(
            backend = ?settings.media.backend,
            max_upload_bytes = settings.media.max_upload_bytes,
            "Media configuration loaded"
        );

        if settings.database.auto_migrate {
            let applied = run_pending_migrations(&settings.database.url)
                .await
                .context("Failed to run migrations")?;
            tracing::info!(count = applied.len(), "Pending migrations applied");
        }

        let pool = establish_async_connection_pool(&settings.database)
            .await
            .context("Failed to initialise the database pool")?;
        tracing::info!("Database connection pool initialized");

        let storage = build_storage(&settings.media).context("Failed to set up media storage")?;
        let state = AppState::new(pool, storage, settings, self.log_level.clone());
        let router = create_router(state, settings);

        let address = settings.server.address();
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind to {address}"))?;
        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM. A handler that fails to install is
/// logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

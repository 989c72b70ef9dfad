//! Server startup and shutdown logic

use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use playdeck_config::PlaydeckConfig;
use playdeck_rest_api::{create_rest_app, AppConfig};

use crate::services::ServiceContainer;

/// Server application struct
pub struct Server {
    config: PlaydeckConfig,
    services: ServiceContainer,
}

impl Server {
    /// Create a new server instance
    pub async fn new(config: PlaydeckConfig) -> Result<Self> {
        // Initialize logging first
        playdeck_logging::init_logging_from_config(&config.logging);

        let services = ServiceContainer::new(&config).await?;

        Ok(Self { config, services })
    }

    /// Build the complete application router
    pub fn build_app(&self) -> Router {
        let app_config = AppConfig {
            enable_cors: self.config.server.enable_cors,
            enable_request_id: self.config.server.enable_request_id,
            enable_tracing: self.config.server.enable_tracing,
        };
        create_rest_app(self.services.app_context(), app_config)
    }

    /// Serve until Ctrl-C or SIGTERM
    ///
    /// After the signal, open connections get `shutdown_timeout` to finish.
    /// Live run streams keep their connection open until the run ends, so
    /// the timeout is what bounds shutdown.
    pub async fn start(self) -> Result<()> {
        let app = self.build_app();
        let addr = self.config.server.listen_address();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        self.log_config_summary();
        info!("Server listening on {}", addr);

        let shutdown = Arc::new(Notify::new());
        let trigger = shutdown.clone();
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                trigger.notify_one();
            })
            .into_future();

        let timeout = self.config.server.shutdown_timeout;
        tokio::select! {
            result = server => result.context("Server error")?,
            _ = async {
                shutdown.notified().await;
                tokio::time::sleep(timeout).await;
            } => {
                warn!("Open connections did not finish within {:?}, exiting", timeout);
            }
        }

        info!("Server shutdown complete");
        Ok(())
    }

    /// Log configuration summary
    fn log_config_summary(&self) {
        let enabled = |on: bool| if on { "Enabled" } else { "Disabled" };
        info!("=== Playdeck Server Configuration ===");
        info!("Bind Address: {}", self.config.server.listen_address());
        info!("Playbook Command: {}", self.config.execution.playbook_command);
        info!("Probe: {} -m {}", self.config.probe.command, self.config.probe.module);
        info!("Templates: {}", self.config.templates.root.display());
        info!("CORS: {}", enabled(self.config.server.enable_cors));
        info!("Request ID: {}", enabled(self.config.server.enable_request_id));
        info!("Tracing: {}", enabled(self.config.server.enable_tracing));
        info!("=====================================");
    }
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}

use axum::Router;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use crate::config::{AppConfig, ConfigError, MongoConfig};
use crate::handler::user_handler::UserHandlerState;
use crate::repository::repository_error::RepositoryError;
use crate::repository::user_repo::UserRepositoryImpl;
use crate::router::user_router::app_router;
use crate::service::user_service::UserServiceImpl;
use crate::util::notifier::LogNotifier;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    /// Loads configuration, connects to MongoDB and wires the routes.
    pub async fn new() -> Result<Self, AppError> {
        let config = AppConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;

        let user_repo = Arc::new(UserRepositoryImpl::new(&mongo_config).await?);
        let user_service = Arc::new(UserServiceImpl::new(user_repo));
        let state = UserHandlerState::new(user_service, Arc::new(LogNotifier));

        let router = app_router(state, config.request_timeout());
        Ok(App { config, router })
    }

    pub async fn start(self) -> Result<(), AppError> {
        let addr = self.config.socket_addr()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("🚀 Server running at http://{}", addr);
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Server gracefully stopped");
        Ok(())
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

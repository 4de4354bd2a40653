//! Sigman Server - HTTP boundary for signal triage
//!
//! Exposes the core operations as JSON endpoints:
//! - `POST /filter_by_source` - source allow-list
//! - `POST /filter_by_regex` - content pattern filter
//! - `POST /score_signals` - (id, EVA) pairs, highest first
//! - `POST /prioritize_signals` - records by EVA, optional top-k
//! - `POST /random_sample` - uniform sample without replacement
//! - `GET /health` - liveness and build info
//!
//! Authentication is expected to be handled by a reverse proxy in front of
//! the service.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;

pub use config::*;
pub use error::*;
pub use models::*;

use axum::Router;
use chrono::{DateTime, Utc};
use tracing::info;

/// Per-process values reported by `/health`
#[derive(Debug, Clone)]
pub struct AppState {
    pub instance_id: String,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            instance_id: uuid::Uuid::new_v4().to_string()[..8].to_string(),
            started_at: Utc::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// The signal triage HTTP server
pub struct SignalServer {
    config: ServerConfig,
    state: AppState,
}

impl SignalServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            state: AppState::new(),
        }
    }

    /// Build the router without binding a socket
    pub fn router(&self) -> Router {
        routes::router(self.state.clone(), &self.config)
    }

    /// Bind and serve until Ctrl-C
    pub async fn serve(self) -> anyhow::Result<()> {
        let router = self.router();
        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;

        info!(
            "Sigman [{}] listening on http://{}",
            self.state.instance_id,
            listener.local_addr()?
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Sigman [{}] stopped", self.state.instance_id);
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

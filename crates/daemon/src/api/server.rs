/// API Server implementation

use super::handlers::*;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Webhook server feeding inbound events to the command router
pub struct ApiServer {
    listen_addr: SocketAddr,
    router: Arc<DaemonRouter>,
}

impl ApiServer {
    pub fn new(listen_addr: SocketAddr, router: Arc<DaemonRouter>) -> Self {
        Self {
            listen_addr,
            router,
        }
    }

    /// Build the axum application
    pub fn app(&self) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/events", post(post_event))
            .layer(TraceLayer::new_for_http())
            .with_state(AppState::new(Arc::clone(&self.router)))
    }

    /// Serve until ctrl-c
    pub async fn start(self) -> Result<()> {
        let app = self.app();

        info!("API server starting on {}", self.listen_addr);

        let listener = tokio::net::TcpListener::bind(self.listen_addr).await?;

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received");
            })
            .await
            .map_err(|e| anyhow::anyhow!("API server error: {}", e))?;

        Ok(())
    }
}

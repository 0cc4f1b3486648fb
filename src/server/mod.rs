//! HTTP boundary: JSON endpoints over a shared [`SiteAgent`].

pub mod error;
pub mod json;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::agent::SiteAgent;
use crate::config::AppConfig;
use crate::error::Result;

pub use error::ApiError;

/// State shared by all handlers.
pub struct ServerState {
    pub agent: Arc<SiteAgent>,
    /// Frontend page served at `/`.
    pub index_path: PathBuf,
}

impl ServerState {
    pub fn new(agent: Arc<SiteAgent>, index_path: impl Into<PathBuf>) -> Self {
        Self {
            agent,
            index_path: index_path.into(),
        }
    }
}

pub fn construct_router(state: Arc<ServerState>) -> Router {
    routes::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &AppConfig, agent: Arc<SiteAgent>) -> Result<()> {
    if config.reload {
        tracing::warn!("RELOAD is set; run under an external watcher to reload on changes");
    }

    let state = Arc::new(ServerState::new(agent, config.index_path.clone()));
    let app = construct_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Frontend: http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

//! Preview Server
//!
//! Renders the three pages server-side with axum, calling the civic API
//! through the configured client on every request.
//!
//! # Routes
//!
//! - `GET /` - citizen lookup (`?search=`, `?lat=&lon=`)
//! - `GET /parties` - election results (`?all=true`, `?state=IN-XX`, `?criteria=true`)
//! - `GET /admin` - analytics dashboard behind Basic auth
//! - `GET /health` - liveness and uptime

pub mod error;
pub mod routes;
pub mod state;

pub use error::{PreviewError, PreviewResult};
pub use state::PreviewState;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::PreviewConfig;

pub fn build_router(state: PreviewState) -> Router {
    Router::new()
        .route("/", get(routes::citizen::citizen))
        .route("/parties", get(routes::parties::parties))
        .route("/admin", get(routes::admin::admin))
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind and serve until Ctrl+C or SIGTERM
pub async fn serve(state: PreviewState, config: &PreviewConfig) -> PreviewResult<()> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Civitas preview listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PreviewError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Civitas preview shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

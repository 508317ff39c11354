//! Civitas preview server
//!
//! Run with: cargo run --bin civitas-preview
//!
//! Reads the same config as the CLI. Useful environment variables:
//! - `CIVITAS_API_URL`: civic API origin (default: http://localhost:8000)
//! - `CIVITAS_PREVIEW_HOST` / `CIVITAS_PREVIEW_PORT`: bind address (default: 127.0.0.1:8084)
//! - `RUST_LOG`: log filter, overrides `[logging] level`

use civitas::client::ApiClient;
use civitas::config::Config;
use civitas::pages::PageContext;
use civitas::preview::{serve, PreviewState};
use civitas::session::FileStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    config.logging.init();

    tracing::info!("Starting Civitas preview v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Civic API: {}", config.api.normalized_base_url());

    let client = ApiClient::http(&config.api)?;
    let store = Arc::new(FileStore::open(config.storage.store_path())?);
    let context = PageContext::new(
        client,
        store,
        config.pages.clone(),
        config.telemetry.enabled,
    );

    let heartbeat = if context.telemetry.is_enabled() {
        Some(
            context
                .telemetry
                .start_heartbeat(config.telemetry.heartbeat_interval()),
        )
    } else {
        None
    };

    serve(PreviewState::new(context), &config.preview).await?;

    if let Some(handle) = heartbeat {
        handle.abort();
    }
    tracing::info!("Civitas preview stopped");
    Ok(())
}

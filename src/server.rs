use std::sync::Arc;

use tracing::info;

use crate::api::{AppState, build_router};
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::PlaylistBuilder;
use crate::spotify::SpotifyCatalog;
use crate::store::JsonPlaylistStore;

/// Serve the HTTP API until the process is stopped.
pub async fn start(config: &Config) -> Result<()> {
    let catalog = Arc::new(SpotifyCatalog::new(config.request_timeout));
    let store = Arc::new(JsonPlaylistStore::open(&config.data_dir).await?);

    let builder = PlaylistBuilder::new(catalog.clone(), store.clone(), config.pipeline);
    let app = build_router(AppState::new(catalog, store, builder));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("HTTP server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

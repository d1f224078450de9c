pub mod error;
pub mod health;
pub mod moods;
pub mod playlists;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::pipeline::PlaylistBuilder;
use crate::spotify::MusicCatalog;
use crate::store::PlaylistStore;

pub use playlists::{CreatePlaylistBody, PlaylistList};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub builder: Arc<PlaylistBuilder>,
    pub catalog: Arc<dyn MusicCatalog>,
    pub store: Arc<dyn PlaylistStore>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn MusicCatalog>,
        store: Arc<dyn PlaylistStore>,
        builder: PlaylistBuilder,
    ) -> Self {
        Self {
            builder: Arc::new(builder),
            catalog,
            store,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/playlists",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route("/moods", get(moods::list_moods));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

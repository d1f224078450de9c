pub mod api;
pub mod config;
pub mod error;
pub mod mood;
pub mod pipeline;
pub mod server;
pub mod spotify;
pub mod store;

pub use config::{Config, PipelineSettings};
pub use error::{AppError, CatalogError, Result};
pub use mood::{MoodLabelSource, MoodTable, RandomMoodLabeler};
pub use pipeline::{BuildReport, BuildRequest, PlaylistBuilder};
pub use spotify::{Credential, MusicCatalog, SpotifyCatalog, SpotifyTrack};
pub use store::{InMemoryPlaylistStore, JsonPlaylistStore, PersistedPlaylist, PlaylistStore};

use serde::{Deserialize, Serialize};

use crate::store::PersistedPlaylist;

/// Per-stage counts of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    pub history_tracks: usize,
    pub selected_tracks: usize,
    pub fallback_used: bool,
    pub fallback_queries: usize,
    pub fallback_added: usize,
    pub requested_tracks: usize,
    pub batches_submitted: usize,
    pub batches_failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub playlist: PersistedPlaylist,
    pub spotify_url: String,
    pub genres_used: Vec<String>,
    /// Authoritative count read back from the service.
    pub total_tracks: usize,
    pub message: String,
    pub stats: BuildStats,
}

impl BuildReport {
    pub fn new(
        playlist: PersistedPlaylist,
        spotify_url: Option<String>,
        stats: BuildStats,
    ) -> Self {
        let spotify_url = spotify_url.unwrap_or_else(|| playlist.spotify_url());
        let message = format!(
            "Created personalized {} playlist with {} tracks from your favorite genres: {}!",
            playlist.mood,
            playlist.total_tracks,
            playlist.genres_used.join(", ")
        );

        Self {
            total_tracks: playlist.total_tracks,
            genres_used: playlist.genres_used.clone(),
            spotify_url,
            message,
            stats,
            playlist,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.total_tracks < self.stats.requested_tracks
    }
}

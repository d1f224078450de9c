pub mod json;
pub mod memory;

pub use json::JsonPlaylistStore;
pub use memory::InMemoryPlaylistStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Fields of a playlist record before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlaylistRecord {
    pub owner_user_id: String,
    pub external_id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub total_tracks: usize,
    pub is_public: bool,
    pub mood: String,
    pub mood_confidence: Option<f64>,
    pub genres_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedPlaylist {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub total_tracks: usize,
    pub is_public: bool,
    pub mood: String,
    /// Set when the mood came from the labeler.
    #[serde(default)]
    pub mood_confidence: Option<f64>,
    pub genres_used: Vec<String>,
    pub owner_user_id: String,
    pub created_at: DateTime<Utc>,
}

impl PersistedPlaylist {
    pub fn from_new(record: NewPlaylistRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            external_id: record.external_id,
            name: record.name,
            description: record.description,
            image_url: record.image_url,
            total_tracks: record.total_tracks,
            is_public: record.is_public,
            mood: record.mood,
            mood_confidence: record.mood_confidence,
            genres_used: record.genres_used,
            owner_user_id: record.owner_user_id,
            created_at: Utc::now(),
        }
    }

    pub fn spotify_url(&self) -> String {
        format!("https://open.spotify.com/playlist/{}", self.external_id)
    }
}

/// Persistence for playlist records. Records are create-only apart from the
/// track count, which can be refreshed from the service.
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Fails if a record with the same external id already exists.
    async fn save_playlist_record(&self, record: NewPlaylistRecord) -> Result<PersistedPlaylist>;

    /// Records of one owner, newest first.
    async fn list_playlists(&self, owner_user_id: &str) -> Result<Vec<PersistedPlaylist>>;

    async fn update_total_tracks(&self, id: Uuid, total_tracks: usize) -> Result<()>;
}

#[cfg(test)]
pub(crate) fn sample_record(owner: &str, external_id: &str) -> NewPlaylistRecord {
    NewPlaylistRecord {
        owner_user_id: owner.to_string(),
        external_id: external_id.to_string(),
        name: "VibeWise - Sad Indie Vibes".to_string(),
        description: "Personalized sad playlist based on your love for indie".to_string(),
        image_url: None,
        total_tracks: 30,
        is_public: true,
        mood: "sad".to_string(),
        mood_confidence: None,
        genres_used: vec!["indie".to_string()],
    }
}

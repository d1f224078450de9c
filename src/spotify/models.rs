use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotifyTrack {
    /// Canonical Spotify track id, used for deduplication.
    pub id: String,
    pub uri: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub popularity: u32,
    /// Audio features, only present when the source returned them.
    pub energy: Option<f32>,
    pub valence: Option<f32>,
}

/// A track as it appears in the user's top-tracks history.
pub type ListeningHistoryEntry = SpotifyTrack;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopArtist {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

/// Playlist as returned by the create call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedPlaylist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub external_url: Option<String>,
    pub public: bool,
}

/// Read-back of an existing playlist; `total_tracks` is the service's own count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSnapshot {
    pub id: String,
    pub name: String,
    pub total_tracks: usize,
    pub image_url: Option<String>,
}

#[cfg(test)]
impl SpotifyTrack {
    pub fn mock(id: &str) -> Self {
        Self {
            id: id.to_string(),
            uri: format!("spotify:track:{}", id),
            name: format!("Track {}", id),
            artists: vec!["Mock Artist".to_string()],
            album: "Mock Album".to_string(),
            popularity: 50,
            energy: None,
            valence: None,
        }
    }
}

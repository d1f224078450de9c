use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CatalogResult;
use crate::spotify::models::{
    CreatedPlaylist, PlaylistSnapshot, SpotifyTrack, TopArtist, UserProfile,
};

/// Listening-history window understood by the top-items endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeWindow::ShortTerm => write!(f, "short_term"),
            TimeWindow::MediumTerm => write!(f, "medium_term"),
            TimeWindow::LongTerm => write!(f, "long_term"),
        }
    }
}

/// Opaque bearer token granting access to a user's Spotify account.
///
/// Never printed; `Debug` redacts the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for a blank token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Parse an `Authorization` header value of the form `Bearer <token>`.
    pub fn from_bearer(header: &str) -> Option<Self> {
        let (scheme, token) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        Self::new(token)
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// The slice of the music service the playlist pipeline depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MusicCatalog: Send + Sync {
    async fn current_user(&self, credential: &Credential) -> CatalogResult<UserProfile>;

    async fn top_artists(
        &self,
        credential: &Credential,
        window: TimeWindow,
        limit: u32,
    ) -> CatalogResult<Vec<TopArtist>>;

    async fn top_tracks(
        &self,
        credential: &Credential,
        window: TimeWindow,
        limit: u32,
    ) -> CatalogResult<Vec<SpotifyTrack>>;

    async fn search_tracks(
        &self,
        credential: &Credential,
        query: &str,
        limit: u32,
    ) -> CatalogResult<Vec<SpotifyTrack>>;

    async fn create_playlist(
        &self,
        credential: &Credential,
        owner_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> CatalogResult<CreatedPlaylist>;

    async fn add_tracks(
        &self,
        credential: &Credential,
        playlist_id: &str,
        uris: &[String],
    ) -> CatalogResult<()>;

    async fn get_playlist(
        &self,
        credential: &Credential,
        playlist_id: &str,
    ) -> CatalogResult<PlaylistSnapshot>;
}

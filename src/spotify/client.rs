use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use rspotify::{
    AuthCodeSpotify, ClientError, Token,
    model::{
        FullPlaylist, FullTrack, PlayableId, PlaylistId, SearchResult, SearchType, TimeRange,
        TrackId, UserId,
    },
    prelude::*,
};
use tracing::debug;
use url::Url;

use crate::error::{AppError, CatalogError, CatalogResult, Result};
use crate::spotify::catalog::{Credential, MusicCatalog, TimeWindow};
use crate::spotify::models::{
    CreatedPlaylist, PlaylistSnapshot, SpotifyTrack, TopArtist, UserProfile,
};

/// `MusicCatalog` backed by the Spotify Web API.
///
/// A client is built per call from the caller's bearer token; token refresh
/// belongs to whoever issued the token. Every call is bounded by `timeout`.
pub struct SpotifyCatalog {
    timeout: Duration,
}

impl SpotifyCatalog {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn client(&self, credential: &Credential) -> AuthCodeSpotify {
        let lifetime = chrono::Duration::seconds(3600);
        let token = Token {
            access_token: credential.secret().to_string(),
            expires_in: lifetime,
            expires_at: Some(chrono::Utc::now() + lifetime),
            refresh_token: None,
            scopes: HashSet::new(),
        };

        AuthCodeSpotify::from_token(token)
    }

    async fn guarded<T, F>(&self, call: F) -> CatalogResult<T>
    where
        F: Future<Output = std::result::Result<T, ClientError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(CatalogError::from),
            Err(_) => Err(CatalogError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl MusicCatalog for SpotifyCatalog {
    async fn current_user(&self, credential: &Credential) -> CatalogResult<UserProfile> {
        let client = self.client(credential);
        let user = self.guarded(client.current_user()).await?;

        Ok(UserProfile {
            id: user.id.id().to_string(),
            display_name: user.display_name,
        })
    }

    async fn top_artists(
        &self,
        credential: &Credential,
        window: TimeWindow,
        limit: u32,
    ) -> CatalogResult<Vec<TopArtist>> {
        let client = self.client(credential);
        let page = self
            .guarded(client.current_user_top_artists_manual(
                Some(time_range(window)),
                Some(limit),
                None,
            ))
            .await?;

        Ok(page
            .items
            .into_iter()
            .map(|artist| TopArtist {
                id: artist.id.id().to_string(),
                name: artist.name,
                genres: artist.genres,
            })
            .collect())
    }

    async fn top_tracks(
        &self,
        credential: &Credential,
        window: TimeWindow,
        limit: u32,
    ) -> CatalogResult<Vec<SpotifyTrack>> {
        let client = self.client(credential);
        let page = self
            .guarded(client.current_user_top_tracks_manual(
                Some(time_range(window)),
                Some(limit),
                None,
            ))
            .await?;

        Ok(page.items.iter().filter_map(convert_track).collect())
    }

    async fn search_tracks(
        &self,
        credential: &Credential,
        query: &str,
        limit: u32,
    ) -> CatalogResult<Vec<SpotifyTrack>> {
        let client = self.client(credential);
        let result = self
            .guarded(client.search(query, SearchType::Track, None, None, Some(limit), None))
            .await?;

        match result {
            SearchResult::Tracks(page) => Ok(page.items.iter().filter_map(convert_track).collect()),
            _ => Err(CatalogError::Unexpected(format!(
                "search for '{}' did not return tracks",
                query
            ))),
        }
    }

    async fn create_playlist(
        &self,
        credential: &Credential,
        owner_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> CatalogResult<CreatedPlaylist> {
        let user_id =
            UserId::from_id(owner_id).map_err(|e| CatalogError::InvalidId(e.to_string()))?;

        let client = self.client(credential);
        let playlist = self
            .guarded(client.user_playlist_create(
                user_id,
                name,
                Some(public),
                Some(false),
                Some(description),
            ))
            .await?;

        Ok(convert_created(playlist, public))
    }

    async fn add_tracks(
        &self,
        credential: &Credential,
        playlist_id: &str,
        uris: &[String],
    ) -> CatalogResult<()> {
        if uris.is_empty() {
            return Ok(());
        }

        let playlist_id = PlaylistId::from_id_or_uri(playlist_id)
            .map_err(|e| CatalogError::InvalidId(e.to_string()))?;

        let items = uris
            .iter()
            .map(|uri| {
                TrackId::from_uri(uri)
                    .map(PlayableId::Track)
                    .map_err(|e| CatalogError::InvalidId(format!("{}: {}", uri, e)))
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        let client = self.client(credential);
        self.guarded(client.playlist_add_items(playlist_id, items, None))
            .await?;

        debug!("Submitted {} tracks to playlist", uris.len());
        Ok(())
    }

    async fn get_playlist(
        &self,
        credential: &Credential,
        playlist_id: &str,
    ) -> CatalogResult<PlaylistSnapshot> {
        let id = PlaylistId::from_id_or_uri(playlist_id)
            .map_err(|e| CatalogError::InvalidId(e.to_string()))?;

        let client = self.client(credential);
        let playlist = self.guarded(client.playlist(id, None, None)).await?;

        Ok(PlaylistSnapshot {
            id: playlist.id.id().to_string(),
            name: playlist.name,
            total_tracks: playlist.tracks.total as usize,
            image_url: playlist.images.into_iter().next().map(|image| image.url),
        })
    }
}

fn time_range(window: TimeWindow) -> TimeRange {
    match window {
        TimeWindow::ShortTerm => TimeRange::ShortTerm,
        TimeWindow::MediumTerm => TimeRange::MediumTerm,
        TimeWindow::LongTerm => TimeRange::LongTerm,
    }
}

fn convert_track(track: &FullTrack) -> Option<SpotifyTrack> {
    // Local files have no id and cannot be added to a playlist
    let Some(id) = track.id.as_ref() else {
        debug!("Skipping local track: {}", track.name);
        return None;
    };

    Some(SpotifyTrack {
        id: id.id().to_string(),
        uri: id.uri(),
        name: track.name.clone(),
        artists: track.artists.iter().map(|a| a.name.clone()).collect(),
        album: track.album.name.clone(),
        popularity: track.popularity,
        energy: None,
        valence: None,
    })
}

fn convert_created(playlist: FullPlaylist, requested_public: bool) -> CreatedPlaylist {
    CreatedPlaylist {
        id: playlist.id.id().to_string(),
        name: playlist.name,
        description: playlist.description.unwrap_or_default(),
        image_url: playlist.images.into_iter().next().map(|image| image.url),
        external_url: playlist.external_urls.get("spotify").cloned(),
        public: playlist.public.unwrap_or(requested_public),
    }
}

/// Extract a playlist id from a Spotify URL, URI or bare id.
///
/// Supports formats:
/// - https://open.spotify.com/playlist/37i9dQZF1E8NC99vGqLsaH
/// - https://open.spotify.com/playlist/37i9dQZF1E8NC99vGqLsaH?si=...
/// - spotify:playlist:37i9dQZF1E8NC99vGqLsaH
/// - 37i9dQZF1E8NC99vGqLsaH
pub fn parse_playlist_ref(input: &str) -> Result<String> {
    let input = input.trim();

    if let Some(id) = input.strip_prefix("spotify:playlist:") {
        return Ok(id.to_string());
    }

    if !input.contains("://") {
        if !input.is_empty() && input.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(input.to_string());
        }
        return Err(AppError::Config(format!("Invalid playlist id: {}", input)));
    }

    let url = Url::parse(input).map_err(|e| AppError::Config(format!("Invalid URL: {}", e)))?;

    let path_segments: Vec<&str> = url
        .path_segments()
        .ok_or_else(|| AppError::Config("Invalid Spotify URL".into()))?
        .collect();

    // Expect /playlist/{id}
    if path_segments.len() >= 2 && path_segments[0] == "playlist" && !path_segments[1].is_empty() {
        Ok(path_segments[1].to_string())
    } else {
        Err(AppError::Config(
            "URL does not appear to be a Spotify playlist URL".into(),
        ))
    }
}

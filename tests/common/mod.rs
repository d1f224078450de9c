#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use vibewise::error::{CatalogError, CatalogResult};
use vibewise::spotify::{
    CreatedPlaylist, Credential, MusicCatalog, PlaylistSnapshot, SpotifyTrack, TimeWindow,
    TopArtist, UserProfile,
};

pub const PLAYLIST_ID: &str = "3cEYpjA9oz9GiPac4AsH4n";

pub fn credential() -> Credential {
    Credential::new("test-token").unwrap()
}

pub fn track(id: &str) -> SpotifyTrack {
    SpotifyTrack {
        id: id.to_string(),
        uri: format!("spotify:track:{}", id),
        name: format!("Track {}", id),
        artists: vec!["Test Artist".to_string()],
        album: "Test Album".to_string(),
        popularity: 50,
        energy: None,
        valence: None,
    }
}

pub fn tracks(range: std::ops::Range<usize>) -> Vec<SpotifyTrack> {
    range.map(|i| track(&format!("t{}", i))).collect()
}

pub fn artist(name: &str, genres: &[&str]) -> TopArtist {
    TopArtist {
        id: name.to_lowercase(),
        name: name.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

/// In-process stand-in for the Spotify catalog.
///
/// The service-side track count is whatever the successful add calls
/// submitted, so read-back behaves like the real service.
pub struct FakeCatalog {
    pub user_id: Option<String>,
    pub artists: Vec<TopArtist>,
    pub history: HashMap<TimeWindow, Vec<SpotifyTrack>>,
    pub search_hits: usize,
    pub fail_create: bool,
    pub fail_add: bool,
    calls: Mutex<Vec<String>>,
    batches: Mutex<Vec<Vec<String>>>,
    playlists: Mutex<HashMap<String, (String, usize)>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            user_id: Some("listener1".to_string()),
            artists: vec![
                artist("Phoebe", &["indie", "folk"]),
                artist("Bon", &["indie", "folk", "chamber pop"]),
                artist("Sufjan", &["indie"]),
            ],
            history: HashMap::new(),
            search_hits: 10,
            fail_create: false,
            fail_add: false,
            calls: Mutex::new(Vec::new()),
            batches: Mutex::new(Vec::new()),
            playlists: Mutex::new(HashMap::new()),
        }
    }

    /// Spread `count` distinct tracks over the three history windows.
    pub fn with_history(mut self, count: usize) -> Self {
        let short = count.min(20);
        let medium = count.min(50);
        self.history.insert(TimeWindow::ShortTerm, tracks(0..short));
        self.history.insert(TimeWindow::MediumTerm, tracks(short..medium));
        self.history.insert(TimeWindow::LongTerm, tracks(medium..count));
        self
    }

    pub fn with_window(mut self, window: TimeWindow, items: Vec<SpotifyTrack>) -> Self {
        self.history.insert(window, items);
        self
    }

    /// Register a playlist the service already knows about.
    pub fn with_playlist(self, id: &str, total_tracks: usize) -> Self {
        self.playlists
            .lock()
            .unwrap()
            .insert(id.to_string(), (format!("Playlist {}", id), total_tracks));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split(' ').next() == Some(method))
            .count()
    }

    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MusicCatalog for FakeCatalog {
    async fn current_user(&self, _credential: &Credential) -> CatalogResult<UserProfile> {
        self.record("current_user".to_string());
        match &self.user_id {
            Some(id) => Ok(UserProfile {
                id: id.clone(),
                display_name: Some("Test Listener".to_string()),
            }),
            None => Err(CatalogError::Unexpected("401 invalid token".to_string())),
        }
    }

    async fn top_artists(
        &self,
        _credential: &Credential,
        window: TimeWindow,
        limit: u32,
    ) -> CatalogResult<Vec<TopArtist>> {
        self.record(format!("top_artists {}", window));
        Ok(self.artists.iter().take(limit as usize).cloned().collect())
    }

    async fn top_tracks(
        &self,
        _credential: &Credential,
        window: TimeWindow,
        limit: u32,
    ) -> CatalogResult<Vec<SpotifyTrack>> {
        self.record(format!("top_tracks {}", window));
        Ok(self
            .history
            .get(&window)
            .map(|items| items.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn search_tracks(
        &self,
        _credential: &Credential,
        query: &str,
        limit: u32,
    ) -> CatalogResult<Vec<SpotifyTrack>> {
        self.record(format!("search_tracks {}", query));
        let prefix: String = query.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        let hits = self.search_hits.min(limit as usize);
        Ok((0..hits).map(|i| track(&format!("{}{}", prefix, i))).collect())
    }

    async fn create_playlist(
        &self,
        _credential: &Credential,
        owner_id: &str,
        name: &str,
        public: bool,
        description: &str,
    ) -> CatalogResult<CreatedPlaylist> {
        self.record(format!("create_playlist {}", owner_id));
        if self.fail_create {
            return Err(CatalogError::Unexpected("403 forbidden".to_string()));
        }

        self.playlists
            .lock()
            .unwrap()
            .insert(PLAYLIST_ID.to_string(), (name.to_string(), 0));

        Ok(CreatedPlaylist {
            id: PLAYLIST_ID.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            image_url: None,
            external_url: Some(format!("https://open.spotify.com/playlist/{}", PLAYLIST_ID)),
            public,
        })
    }

    async fn add_tracks(
        &self,
        _credential: &Credential,
        playlist_id: &str,
        uris: &[String],
    ) -> CatalogResult<()> {
        self.record(format!("add_tracks {}", uris.len()));
        if self.fail_add {
            return Err(CatalogError::Unexpected("500 server error".to_string()));
        }

        self.batches.lock().unwrap().push(uris.to_vec());
        if let Some(entry) = self.playlists.lock().unwrap().get_mut(playlist_id) {
            entry.1 += uris.len();
        }
        Ok(())
    }

    async fn get_playlist(
        &self,
        _credential: &Credential,
        playlist_id: &str,
    ) -> CatalogResult<PlaylistSnapshot> {
        self.record(format!("get_playlist {}", playlist_id));
        let playlists = self.playlists.lock().unwrap();
        let (name, total_tracks) = playlists
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| CatalogError::Unexpected(format!("404 {}", playlist_id)))?;

        Ok(PlaylistSnapshot {
            id: playlist_id.to_string(),
            name,
            total_tracks,
            image_url: None,
        })
    }
}

use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use crate::config::PipelineSettings;
use crate::error::{AppError, Result};
use crate::mood::{MoodLabel, MoodTable, parse_mood};
use crate::pipeline::assembler::PlaylistAssembler;
use crate::pipeline::draft::PlaylistDraft;
use crate::pipeline::fallback::FallbackSearch;
use crate::pipeline::genres::GenreAggregator;
use crate::pipeline::history::HistoryAggregator;
use crate::pipeline::report::{BuildReport, BuildStats};
use crate::pipeline::selector::TrackSelector;
use crate::spotify::{Credential, MusicCatalog};
use crate::store::{NewPlaylistRecord, PlaylistStore};

/// How many of the ranked genres are recorded with the playlist.
const GENRES_RECORDED: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    FetchingHistory,
    SelectingTracks,
    FallbackSearching,
    CreatingPlaylist,
    AddingTracks,
    Done,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStage::FetchingHistory => "FETCHING_HISTORY",
            BuildStage::SelectingTracks => "SELECTING_TRACKS",
            BuildStage::FallbackSearching => "FALLBACK_SEARCHING",
            BuildStage::CreatingPlaylist => "CREATING_PLAYLIST",
            BuildStage::AddingTracks => "ADDING_TRACKS",
            BuildStage::Done => "DONE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    pub mood: Option<String>,
    pub credential: Option<Credential>,
    /// Spotify user id of the owner; resolved from the credential when absent.
    pub owner_id: Option<String>,
    /// Labeler confidence when the mood was detected rather than chosen.
    pub mood_confidence: Option<f64>,
}

impl BuildRequest {
    pub fn new(mood: impl Into<String>, credential: Credential) -> Self {
        Self {
            mood: Some(mood.into()),
            credential: Some(credential),
            owner_id: None,
            mood_confidence: None,
        }
    }

    /// Request for a mood produced by a [`MoodLabelSource`](crate::mood::MoodLabelSource).
    pub fn from_label(label: MoodLabel, credential: Credential) -> Self {
        Self {
            mood_confidence: Some(label.confidence),
            ..Self::new(label.mood, credential)
        }
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }
}

/// Runs one playlist build from history fetch to persisted record.
pub struct PlaylistBuilder {
    catalog: Arc<dyn MusicCatalog>,
    store: Arc<dyn PlaylistStore>,
    settings: PipelineSettings,
    moods: &'static MoodTable,
}

impl PlaylistBuilder {
    pub fn new(
        catalog: Arc<dyn MusicCatalog>,
        store: Arc<dyn PlaylistStore>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            catalog,
            store,
            settings,
            moods: MoodTable::global(),
        }
    }

    /// Preconditions are checked before any catalog call. After that only a
    /// failed playlist creation or a failed record write is an error.
    pub async fn build(&self, request: BuildRequest) -> Result<BuildReport> {
        let mood = parse_mood(request.mood.as_deref())?;
        let credential = request.credential.ok_or_else(|| {
            AppError::Unauthenticated("Please connect Spotify to create playlists".into())
        })?;
        let owner_id = self.resolve_owner(&credential, request.owner_id).await?;

        info!("Building {} playlist for Spotify user {}", mood, owner_id);
        let catalog = self.catalog.as_ref();
        let mut stats = BuildStats::default();

        self.enter(BuildStage::FetchingHistory);
        let genres = GenreAggregator::new(catalog)
            .top_genres(&credential, self.settings.genre_limit)
            .await;
        let history = HistoryAggregator::new(catalog).fetch(&credential).await;
        stats.history_tracks = history.len();

        self.enter(BuildStage::SelectingTracks);
        if !self.moods.is_known(&mood) {
            info!("No policy for mood '{}', using neutral", mood);
        }
        let policy = self.moods.policy(&mood);
        let mut draft = PlaylistDraft::for_mood(&mood, &genres);
        for entry in TrackSelector::new(self.settings.target_tracks).select(&history, policy) {
            draft.insert(entry);
        }
        stats.selected_tracks = draft.len();
        info!(
            "Selected {} tracks from rank window {}..{}",
            draft.len(),
            policy.preferred_rank_window.start,
            policy.preferred_rank_window.end
        );

        let fallback = FallbackSearch::new(
            catalog,
            self.settings.target_tracks,
            self.settings.min_tracks,
        );
        if fallback.is_needed(draft.len()) {
            self.enter(BuildStage::FallbackSearching);
            let outcome = fallback
                .top_up(&credential, &mut draft, &genres, self.moods.keywords(&mood))
                .await;
            stats.fallback_used = true;
            stats.fallback_queries = outcome.queries;
            stats.fallback_added = outcome.added;
        }

        self.enter(BuildStage::CreatingPlaylist);
        stats.requested_tracks = draft.len();
        let assembled = PlaylistAssembler::new(catalog)
            .assemble(&credential, &owner_id, draft)
            .await?;
        stats.batches_submitted = assembled.batches_submitted;
        stats.batches_failed = assembled.batches_failed;

        let genres_used: Vec<String> = genres.into_iter().take(GENRES_RECORDED).collect();
        let record = NewPlaylistRecord {
            owner_user_id: owner_id,
            external_id: assembled.external_id.clone(),
            name: assembled.name,
            description: assembled.description,
            image_url: assembled.image_url,
            total_tracks: assembled.total_tracks,
            is_public: assembled.is_public,
            mood,
            mood_confidence: request.mood_confidence,
            genres_used,
        };

        let persisted = self.store.save_playlist_record(record).await.map_err(|e| {
            error!(
                "Spotify playlist {} was created but its record could not be saved: {}",
                assembled.external_id, e
            );
            AppError::Storage(e.to_string())
        })?;

        self.enter(BuildStage::Done);
        info!(
            "Playlist build completed: {} - {}/{} tracks",
            persisted.name, persisted.total_tracks, stats.requested_tracks
        );

        Ok(BuildReport::new(persisted, assembled.external_url, stats))
    }

    /// Use `owner_id` when given, otherwise ask the catalog who the credential
    /// belongs to.
    pub async fn resolve_owner(
        &self,
        credential: &Credential,
        owner_id: Option<String>,
    ) -> Result<String> {
        if let Some(owner_id) = owner_id.filter(|id| !id.trim().is_empty()) {
            return Ok(owner_id.trim().to_string());
        }

        let profile = self
            .catalog
            .current_user(credential)
            .await
            .map_err(|e| AppError::Unauthenticated(format!("Could not resolve Spotify user: {}", e)))?;

        let display_name = profile.display_name.as_deref().unwrap_or(&profile.id);
        info!("Authenticated as Spotify user: {}", display_name);

        Ok(profile.id)
    }

    fn enter(&self, stage: BuildStage) {
        info!("Build stage: {}", stage);
    }
}

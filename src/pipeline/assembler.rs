use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::pipeline::draft::PlaylistDraft;
use crate::pipeline::orchestrator::BuildStage;
use crate::spotify::{Credential, MusicCatalog};

/// Spotify accepts at most this many items per add request.
pub const ADD_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledPlaylist {
    pub external_id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub external_url: Option<String>,
    pub is_public: bool,
    /// Track count as reported by the service after submission.
    pub total_tracks: usize,
    pub requested_tracks: usize,
    pub batches_submitted: usize,
    pub batches_failed: usize,
}

/// Creates the playlist on the service and fills it in batches.
pub struct PlaylistAssembler<'a> {
    catalog: &'a dyn MusicCatalog,
}

impl<'a> PlaylistAssembler<'a> {
    pub fn new(catalog: &'a dyn MusicCatalog) -> Self {
        Self { catalog }
    }

    /// Only the create call is fatal. Failed batches are logged and the
    /// playlist is still returned, with the track count read back from the
    /// service.
    pub async fn assemble(
        &self,
        credential: &Credential,
        owner_id: &str,
        draft: PlaylistDraft,
    ) -> Result<AssembledPlaylist> {
        let created = self
            .catalog
            .create_playlist(credential, owner_id, &draft.name, true, &draft.description)
            .await
            .map_err(AppError::PlaylistCreation)?;

        info!("Created Spotify playlist: {} ({})", created.name, created.id);
        info!("Build stage: {}", BuildStage::AddingTracks);

        let uris = draft.into_uris();
        let mut batches_submitted = 0;
        let mut batches_failed = 0;
        let mut accepted = 0;

        for (i, chunk) in uris.chunks(ADD_BATCH_SIZE).enumerate() {
            batches_submitted += 1;
            match self.catalog.add_tracks(credential, &created.id, chunk).await {
                Ok(()) => {
                    accepted += chunk.len();
                    info!("Added {} tracks to playlist", chunk.len());
                }
                Err(e) => {
                    batches_failed += 1;
                    warn!(
                        "Failed to add batch {} to playlist {}: {}",
                        i + 1,
                        created.name,
                        e
                    );
                }
            }
        }

        let (total_tracks, image_url) = match self.catalog.get_playlist(credential, &created.id).await
        {
            Ok(snapshot) => (snapshot.total_tracks, snapshot.image_url.or(created.image_url)),
            Err(e) => {
                warn!(
                    "Could not read back playlist {}, reporting {} accepted tracks: {}",
                    created.id, accepted, e
                );
                (accepted, created.image_url)
            }
        };

        if total_tracks < uris.len() {
            warn!(
                "Playlist {} has {} of {} requested tracks",
                created.name,
                total_tracks,
                uris.len()
            );
        }

        Ok(AssembledPlaylist {
            external_id: created.id,
            name: created.name,
            description: created.description,
            image_url,
            external_url: created.external_url,
            is_public: created.public,
            total_tracks,
            requested_tracks: uris.len(),
            batches_submitted,
            batches_failed,
        })
    }
}

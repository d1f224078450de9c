use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::pipeline::{BuildReport, BuildRequest};
use crate::spotify::Credential;
use crate::store::PersistedPlaylist;

#[derive(Debug, Default, Deserialize)]
pub struct CreatePlaylistBody {
    /// Kept untyped so a non-string mood is reported as an invalid mood.
    pub mood: Option<Value>,
    pub owner_id: Option<String>,
}

impl CreatePlaylistBody {
    pub fn mood_text(&self) -> Result<Option<String>> {
        match &self.mood {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(mood)) => Ok(Some(mood.clone())),
            Some(other) => Err(AppError::InvalidMood(format!(
                "Mood must be a string, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistList {
    pub playlists: Vec<PersistedPlaylist>,
    pub total: usize,
}

pub(crate) fn bearer_credential(headers: &HeaderMap) -> Option<Credential> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(Credential::from_bearer)
}

/// `POST /api/playlists`: build a playlist for the given mood.
pub async fn create_playlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<CreatePlaylistBody>, JsonRejection>,
) -> Result<(StatusCode, Json<BuildReport>)> {
    let Json(body) = payload?;

    let request = BuildRequest {
        mood: body.mood_text()?,
        credential: bearer_credential(&headers),
        owner_id: body.owner_id,
        ..BuildRequest::default()
    };

    let report = state.builder.build(request).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// `GET /api/playlists`: the caller's playlists with live track counts.
///
/// A playlist whose read-back fails keeps its stored count.
pub async fn list_playlists(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PlaylistList>> {
    let credential = bearer_credential(&headers)
        .ok_or_else(|| AppError::Unauthenticated("Authentication required".into()))?;
    let owner_id = state.builder.resolve_owner(&credential, None).await?;

    let mut playlists = state.store.list_playlists(&owner_id).await?;

    for playlist in playlists.iter_mut() {
        match state
            .catalog
            .get_playlist(&credential, &playlist.external_id)
            .await
        {
            Ok(snapshot) if snapshot.total_tracks != playlist.total_tracks => {
                debug!(
                    "Refreshing track count of {}: {} -> {}",
                    playlist.external_id, playlist.total_tracks, snapshot.total_tracks
                );
                playlist.total_tracks = snapshot.total_tracks;
                if let Err(e) = state
                    .store
                    .update_total_tracks(playlist.id, snapshot.total_tracks)
                    .await
                {
                    warn!("Failed to store refreshed track count: {}", e);
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    "Error fetching playlist {}, using stored count: {}",
                    playlist.external_id, e
                );
            }
        }
    }

    let total = playlists.len();
    Ok(Json(PlaylistList { playlists, total }))
}

use std::time::Duration;

use thiserror::Error;

/// Failure of a single call against the music catalog.
///
/// Pipeline stages decide per call whether this degrades to a default, is
/// skipped, or aborts the build.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Spotify API error: {0}")]
    Spotify(#[from] rspotify::ClientError),

    #[error("Spotify request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid Spotify identifier: {0}")]
    InvalidId(String),

    #[error("Unexpected Spotify response: {0}")]
    Unexpected(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid mood: {0}")]
    InvalidMood(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Authentication failed: {0}")]
    Unauthenticated(String),

    #[error("Failed to create playlist: {0}")]
    PlaylistCreation(#[source] CatalogError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Playlist not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

pub mod catalog;
pub mod client;
pub mod models;

pub use catalog::{Credential, MusicCatalog, TimeWindow};
pub use client::{SpotifyCatalog, parse_playlist_ref};
pub use models::{
    CreatedPlaylist, ListeningHistoryEntry, PlaylistSnapshot, SpotifyTrack, TopArtist,
    UserProfile,
};

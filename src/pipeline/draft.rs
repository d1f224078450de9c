use std::collections::HashSet;

use crate::spotify::SpotifyTrack;

pub const APP_NAME: &str = "VibeWise";

/// Playlist under construction. URIs are kept unique at every stage.
#[derive(Debug, Clone, Default)]
pub struct PlaylistDraft {
    pub name: String,
    pub description: String,
    target_track_uris: Vec<String>,
    seen_ids: HashSet<String>,
    seen_uris: HashSet<String>,
}

impl PlaylistDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Name and describe a draft after the mood and the user's primary genre.
    pub fn for_mood(mood: &str, genres: &[String]) -> Self {
        let primary_genre = genres.first().map(String::as_str).unwrap_or("music");

        Self::new(
            format!(
                "{} - {} {} Vibes",
                APP_NAME,
                title_case(mood),
                title_case(primary_genre)
            ),
            format!(
                "Personalized {} playlist based on your love for {}",
                mood, primary_genre
            ),
        )
    }

    /// Append `track` unless its id or URI is already present.
    pub fn insert(&mut self, track: &SpotifyTrack) -> bool {
        if self.seen_ids.contains(&track.id) || self.seen_uris.contains(&track.uri) {
            return false;
        }

        self.seen_ids.insert(track.id.clone());
        self.seen_uris.insert(track.uri.clone());
        self.target_track_uris.push(track.uri.clone());
        true
    }

    pub fn uris(&self) -> &[String] {
        &self.target_track_uris
    }

    pub fn len(&self) -> usize {
        self.target_track_uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target_track_uris.is_empty()
    }

    pub fn into_uris(self) -> Vec<String> {
        self.target_track_uris
    }
}

/// Capitalize the first letter of every alphabetic run: "k-pop" -> "K-Pop".
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;

    for c in input.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::pipeline::draft::PlaylistDraft;
use crate::spotify::{Credential, MusicCatalog};

const FALLBACK_GENRES: usize = 2;
const FALLBACK_KEYWORDS: usize = 3;
const KEYWORD_SEARCH_LIMIT: u32 = 10;
const GENRE_SEARCH_LIMIT: u32 = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FallbackOutcome {
    pub queries: usize,
    pub failed_queries: usize,
    pub added: usize,
}

/// Tops up a draft from catalog search by genre and mood keyword.
pub struct FallbackSearch<'a> {
    catalog: &'a dyn MusicCatalog,
    target: usize,
    minimum: usize,
}

impl<'a> FallbackSearch<'a> {
    pub fn new(catalog: &'a dyn MusicCatalog, target: usize, minimum: usize) -> Self {
        Self {
            catalog,
            target,
            minimum,
        }
    }

    /// Whether a draft of `selected` tracks needs topping up.
    pub fn is_needed(&self, selected: usize) -> bool {
        selected < self.minimum
    }

    /// Search `"{keyword} genre:{genre}"` for the top genres and keywords until
    /// the draft reaches the target. If it is still under the minimum, search
    /// `"genre:{genre}"` alone. Failed queries are skipped.
    pub async fn top_up(
        &self,
        credential: &Credential,
        draft: &mut PlaylistDraft,
        genres: &[String],
        keywords: &[&str],
    ) -> FallbackOutcome {
        let mut outcome = FallbackOutcome::default();
        let genres = &genres[..genres.len().min(FALLBACK_GENRES)];
        let keywords = &keywords[..keywords.len().min(FALLBACK_KEYWORDS)];

        'keyword_pass: for genre in genres {
            for keyword in keywords {
                if draft.len() >= self.target {
                    break 'keyword_pass;
                }
                let query = format!("{} genre:{}", keyword, genre);
                self.search_into(credential, draft, &query, KEYWORD_SEARCH_LIMIT, &mut outcome)
                    .await;
            }
        }

        if draft.len() < self.minimum {
            for genre in genres {
                if draft.len() >= self.target {
                    break;
                }
                let query = format!("genre:{}", genre);
                self.search_into(credential, draft, &query, GENRE_SEARCH_LIMIT, &mut outcome)
                    .await;
            }
        }

        info!(
            "Fallback search added {} tracks over {} queries ({} failed)",
            outcome.added, outcome.queries, outcome.failed_queries
        );
        outcome
    }

    async fn search_into(
        &self,
        credential: &Credential,
        draft: &mut PlaylistDraft,
        query: &str,
        limit: u32,
        outcome: &mut FallbackOutcome,
    ) {
        outcome.queries += 1;

        let tracks = match self.catalog.search_tracks(credential, query, limit).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!("Search failed for '{}', skipping: {}", query, e);
                outcome.failed_queries += 1;
                return;
            }
        };

        for track in &tracks {
            if draft.len() >= self.target {
                break;
            }
            if draft.insert(track) {
                outcome.added += 1;
            }
        }
        debug!("Search '{}' returned {} tracks", query, tracks.len());
    }
}

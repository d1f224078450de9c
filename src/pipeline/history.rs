use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::spotify::{Credential, ListeningHistoryEntry, MusicCatalog, TimeWindow};

/// Windows queried for history, in priority order, with their result caps.
pub const HISTORY_WINDOWS: [(TimeWindow, u32); 3] = [
    (TimeWindow::ShortTerm, 20),
    (TimeWindow::MediumTerm, 30),
    (TimeWindow::LongTerm, 50),
];

/// Merges the user's top tracks across all history windows.
pub struct HistoryAggregator<'a> {
    catalog: &'a dyn MusicCatalog,
}

impl<'a> HistoryAggregator<'a> {
    pub fn new(catalog: &'a dyn MusicCatalog) -> Self {
        Self { catalog }
    }

    /// Deduplicated history, first seen short -> medium -> long.
    ///
    /// A failing window contributes nothing; this never fails as a whole.
    pub async fn fetch(&self, credential: &Credential) -> Vec<ListeningHistoryEntry> {
        let mut merged = Vec::new();

        for (window, limit) in HISTORY_WINDOWS {
            match self.catalog.top_tracks(credential, window, limit).await {
                Ok(tracks) => {
                    debug!("Fetched {} top tracks for {}", tracks.len(), window);
                    merged.extend(tracks);
                }
                Err(e) => {
                    warn!("Failed to fetch {} top tracks, skipping: {}", window, e);
                }
            }
        }

        let history = dedupe_history(merged);
        info!("Listening history: {} unique tracks", history.len());
        history
    }
}

/// Drop repeated track ids, keeping the first occurrence.
pub fn dedupe_history<I>(entries: I) -> Vec<ListeningHistoryEntry>
where
    I: IntoIterator<Item = ListeningHistoryEntry>,
{
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::spotify::SpotifyTrack;
    use crate::spotify::catalog::MockMusicCatalog;

    fn tracks(prefix: &str, ids: &[&str]) -> Vec<SpotifyTrack> {
        ids.iter()
            .map(|id| {
                let mut track = SpotifyTrack::mock(id);
                track.name = format!("{} {}", prefix, id);
                track
            })
            .collect()
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let mut entries = tracks("short", &["a", "b"]);
        entries.extend(tracks("long", &["b", "c", "a"]));

        let deduped = dedupe_history(entries);

        let ids: Vec<_> = deduped.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(deduped[1].name, "short b");
    }

    #[tokio::test]
    async fn test_fetch_merges_windows_in_order() {
        let mut catalog = MockMusicCatalog::new();
        catalog
            .expect_top_tracks()
            .times(3)
            .returning(|_, window, limit| {
                let result = match window {
                    TimeWindow::ShortTerm => {
                        assert_eq!(limit, 20);
                        tracks("short", &["x", "y"])
                    }
                    TimeWindow::MediumTerm => {
                        assert_eq!(limit, 30);
                        tracks("medium", &["y", "z"])
                    }
                    TimeWindow::LongTerm => {
                        assert_eq!(limit, 50);
                        tracks("long", &["z", "x", "w"])
                    }
                };
                Ok(result)
            });

        let history = HistoryAggregator::new(&catalog)
            .fetch(&Credential::new("token").unwrap())
            .await;

        let names: Vec<_> = history.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["short x", "short y", "medium z", "long w"]);
    }

    #[tokio::test]
    async fn test_failed_window_is_skipped() {
        let mut catalog = MockMusicCatalog::new();
        catalog
            .expect_top_tracks()
            .times(3)
            .returning(|_, window, _| match window {
                TimeWindow::MediumTerm => Err(CatalogError::Unexpected("502".into())),
                TimeWindow::ShortTerm => Ok(tracks("short", &["a"])),
                TimeWindow::LongTerm => Ok(tracks("long", &["b"])),
            });

        let history = HistoryAggregator::new(&catalog)
            .fetch(&Credential::new("token").unwrap())
            .await;

        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_all_windows_failing_yields_empty_history() {
        let mut catalog = MockMusicCatalog::new();
        catalog
            .expect_top_tracks()
            .returning(|_, _, _| Err(CatalogError::Unexpected("401".into())));

        let history = HistoryAggregator::new(&catalog)
            .fetch(&Credential::new("token").unwrap())
            .await;

        assert!(history.is_empty());
    }
}

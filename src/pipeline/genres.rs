use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::spotify::{Credential, MusicCatalog, TimeWindow};

pub const DEFAULT_GENRES: [&str; 2] = ["pop", "rock"];
pub const DEFAULT_GENRE_LIMIT: usize = 10;
const TOP_ARTISTS_LIMIT: u32 = 50;

/// Genres with their occurrence count, most frequent first.
/// Ties keep the order in which genres were first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenreRanking(Vec<(String, usize)>);

impl GenreRanking {
    pub fn tally<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for genre in genres {
            let genre = genre.into();
            match positions.get(&genre) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    positions.insert(genre.clone(), counts.len());
                    counts.push((genre, 1));
                }
            }
        }

        // Stable sort keeps first-seen order among equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Self(counts)
    }

    pub fn top(&self, limit: usize) -> Vec<String> {
        self.0
            .iter()
            .take(limit)
            .map(|(genre, _)| genre.clone())
            .collect()
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn default_genres() -> Vec<String> {
    DEFAULT_GENRES.iter().map(|g| g.to_string()).collect()
}

/// Ranks the genres of a user's medium-term top artists.
pub struct GenreAggregator<'a> {
    catalog: &'a dyn MusicCatalog,
}

impl<'a> GenreAggregator<'a> {
    pub fn new(catalog: &'a dyn MusicCatalog) -> Self {
        Self { catalog }
    }

    /// Top `limit` genres. Never fails: any catalog error, or an empty
    /// history, yields [`DEFAULT_GENRES`].
    pub async fn top_genres(&self, credential: &Credential, limit: usize) -> Vec<String> {
        let artists = match self
            .catalog
            .top_artists(credential, TimeWindow::MediumTerm, TOP_ARTISTS_LIMIT)
            .await
        {
            Ok(artists) => artists,
            Err(e) => {
                warn!("Failed to fetch top artists, using default genres: {}", e);
                return default_genres();
            }
        };

        let ranking = GenreRanking::tally(artists.into_iter().flat_map(|a| a.genres));
        if ranking.is_empty() {
            info!("No genres in listening history, using default genres");
            return default_genres();
        }

        let genres = ranking.top(limit);
        info!("User's top genres: {}", genres.join(", "));
        genres
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::spotify::catalog::MockMusicCatalog;
    use crate::spotify::TopArtist;

    fn artist(name: &str, genres: &[&str]) -> TopArtist {
        TopArtist {
            id: name.to_lowercase(),
            name: name.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn credential() -> Credential {
        Credential::new("token").unwrap()
    }

    #[test]
    fn test_tally_orders_by_count_then_first_seen() {
        let ranking = GenreRanking::tally(["indie", "rock", "pop", "rock", "pop", "jazz"]);

        assert_eq!(
            ranking.entries(),
            &[
                ("rock".to_string(), 2),
                ("pop".to_string(), 2),
                ("indie".to_string(), 1),
                ("jazz".to_string(), 1),
            ]
        );
        assert_eq!(ranking.top(2), vec!["rock", "pop"]);
    }

    #[tokio::test]
    async fn test_top_genres_from_artists() {
        let mut catalog = MockMusicCatalog::new();
        catalog
            .expect_top_artists()
            .withf(|_, window, limit| *window == TimeWindow::MediumTerm && *limit == 50)
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![
                    artist("A", &["shoegaze", "dream pop"]),
                    artist("B", &["dream pop"]),
                    artist("C", &["post-rock", "shoegaze", "dream pop"]),
                ])
            });

        let genres = GenreAggregator::new(&catalog)
            .top_genres(&credential(), 2)
            .await;

        assert_eq!(genres, vec!["dream pop", "shoegaze"]);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_default() {
        let mut catalog = MockMusicCatalog::new();
        catalog
            .expect_top_artists()
            .returning(|_, _, _| Err(CatalogError::Unexpected("connection reset".into())));

        let genres = GenreAggregator::new(&catalog)
            .top_genres(&credential(), DEFAULT_GENRE_LIMIT)
            .await;

        assert_eq!(genres, vec!["pop", "rock"]);
    }

    #[tokio::test]
    async fn test_no_genres_degrades_to_default() {
        let mut catalog = MockMusicCatalog::new();
        catalog
            .expect_top_artists()
            .returning(|_, _, _| Ok(vec![artist("A", &[])]));

        let genres = GenreAggregator::new(&catalog)
            .top_genres(&credential(), DEFAULT_GENRE_LIMIT)
            .await;

        assert_eq!(genres, vec!["pop", "rock"]);
    }
}

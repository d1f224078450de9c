use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::store::{NewPlaylistRecord, PersistedPlaylist, PlaylistStore};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryPlaylistStore {
    records: Mutex<Vec<PersistedPlaylist>>,
}

impl InMemoryPlaylistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn all(&self) -> Vec<PersistedPlaylist> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl PlaylistStore for InMemoryPlaylistStore {
    async fn save_playlist_record(&self, record: NewPlaylistRecord) -> Result<PersistedPlaylist> {
        let mut records = self.records.lock().await;

        if records.iter().any(|r| r.external_id == record.external_id) {
            return Err(AppError::Storage(format!(
                "playlist {} is already recorded",
                record.external_id
            )));
        }

        let persisted = PersistedPlaylist::from_new(record);
        records.push(persisted.clone());
        Ok(persisted)
    }

    async fn list_playlists(&self, owner_user_id: &str) -> Result<Vec<PersistedPlaylist>> {
        let records = self.records.lock().await;
        let mut owned: Vec<_> = records
            .iter()
            .filter(|r| r.owner_user_id == owner_user_id)
            .cloned()
            .collect();
        owned.reverse();
        Ok(owned)
    }

    async fn update_total_tracks(&self, id: Uuid, total_tracks: usize) -> Result<()> {
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        record.total_tracks = total_tracks;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sample_record;

    #[tokio::test]
    async fn test_save_and_list_newest_first() {
        let store = InMemoryPlaylistStore::new();

        store.save_playlist_record(sample_record("u1", "a")).await.unwrap();
        store.save_playlist_record(sample_record("u2", "b")).await.unwrap();
        store.save_playlist_record(sample_record("u1", "c")).await.unwrap();

        let listed = store.list_playlists("u1").await.unwrap();
        let ids: Vec<_> = listed.iter().map(|r| r.external_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_duplicate_external_id_rejected() {
        let store = InMemoryPlaylistStore::new();

        store.save_playlist_record(sample_record("u1", "a")).await.unwrap();
        let err = store
            .save_playlist_record(sample_record("u1", "a"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_total_tracks() {
        let store = InMemoryPlaylistStore::new();
        let saved = store.save_playlist_record(sample_record("u1", "a")).await.unwrap();

        store.update_total_tracks(saved.id, 12).await.unwrap();
        assert_eq!(store.all().await[0].total_tracks, 12);

        let missing = store.update_total_tracks(Uuid::new_v4(), 1).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::store::{NewPlaylistRecord, PersistedPlaylist, PlaylistStore};

const RECORDS_FILE: &str = "playlists.json";

/// Stores all records as one pretty-printed JSON array under `data_dir`.
pub struct JsonPlaylistStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl JsonPlaylistStore {
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).await?;

        let path = data_dir.join(RECORDS_FILE);
        info!("Playlist records stored in: {}", path.display());

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<PersistedPlaylist>> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, records: &[PersistedPlaylist]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl PlaylistStore for JsonPlaylistStore {
    async fn save_playlist_record(&self, record: NewPlaylistRecord) -> Result<PersistedPlaylist> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;

        if records.iter().any(|r| r.external_id == record.external_id) {
            return Err(AppError::Storage(format!(
                "playlist {} is already recorded",
                record.external_id
            )));
        }

        let persisted = PersistedPlaylist::from_new(record);
        records.push(persisted.clone());
        self.write(&records).await?;

        Ok(persisted)
    }

    async fn list_playlists(&self, owner_user_id: &str) -> Result<Vec<PersistedPlaylist>> {
        let _guard = self.lock.lock().await;
        let mut owned: Vec<_> = self
            .load()
            .await?
            .into_iter()
            .filter(|r| r.owner_user_id == owner_user_id)
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update_total_tracks(&self, id: Uuid, total_tracks: usize) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;

        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        record.total_tracks = total_tracks;

        self.write(&records).await
    }
}

use std::path::PathBuf;

use crate::{StateError, STATE_FILE_DIR};

/// The key-value byte store the session snapshot lives in. The medium is a
/// collaborator, not part of the core, so it stays behind this boundary.
pub trait SnapshotStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateError>;
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StateError>;
    async fn remove(&self, key: &str) -> Result<(), StateError>;
}

/// One file per key under the state directory.
pub struct FileStore {
    state_dir: PathBuf,
}

impl FileStore {
    pub async fn start() -> Result<Self, StateError> {
        let root: PathBuf = project_root::get_project_root()
            .map_err(|_| StateError::Store("Failed to resolve project root".to_string()))?;
        Self::start_at(root.join(STATE_FILE_DIR)).await
    }

    pub async fn start_at(state_dir: PathBuf) -> Result<Self, StateError> {
        // Create state dir if it doesn't exist
        if !state_dir.exists() {
            tokio::fs::create_dir_all(&state_dir).await.map_err(|_| {
                StateError::Store(format!("Failed to create state directory: {:?}", state_dir))
            })?;
        }

        Ok(FileStore { state_dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.state_dir.join(key)
    }
}

impl SnapshotStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StateError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        tokio::fs::read(&path)
            .await
            .map(Some)
            .map_err(|_| StateError::Store(format!("Failed to read state file: {:?}", path)))
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StateError> {
        let path = self.key_path(key);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|_| StateError::Store(format!("Failed to write state file: {:?}", path)))
    }

    async fn remove(&self, key: &str) -> Result<(), StateError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(());
        }

        tokio::fs::remove_file(&path)
            .await
            .map_err(|_| StateError::Store(format!("Failed to remove state file: {:?}", path)))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) async fn test_store(name: &str) -> FileStore {
        let dir = std::env::temp_dir().join("run_tracker_tests").join(name);
        let _ = tokio::fs::remove_dir_all(&dir).await;
        FileStore::start_at(dir).await.unwrap()
    }

    #[tokio::test]
    async fn put_get_remove_round_trip() {
        let store = test_store("store_round_trip").await;

        assert!(store.get("missing").await.unwrap().is_none());

        store.put("key", b"bytes").await.unwrap();
        assert_eq!(store.get("key").await.unwrap().unwrap(), b"bytes");

        store.put("key", b"overwritten").await.unwrap();
        assert_eq!(store.get("key").await.unwrap().unwrap(), b"overwritten");

        store.remove("key").await.unwrap();
        assert!(store.get("key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_missing_key_is_fine() {
        let store = test_store("store_remove_missing").await;
        store.remove("never_written").await.unwrap();
    }
}

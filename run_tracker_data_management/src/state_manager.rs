use run_tracker_lib::{track::Track, track_snapshot::TrackSnapshot};

use crate::{FileStore, SnapshotStore, StateError};

/// The fixed key the current session snapshot is saved under. Overwritten
/// on every accepted fix and on reset.
pub const CURRENT_TRACK_KEY: &str = "current_track";

/// The public interface for all session state persistence.
pub struct StateManager<S = FileStore> {
    store: S,
}

impl StateManager<FileStore> {
    pub async fn start() -> Result<Self, StateError> {
        Ok(StateManager {
            store: FileStore::start().await?,
        })
    }
}

impl<S: SnapshotStore> StateManager<S> {
    pub fn with_store(store: S) -> Self {
        StateManager { store }
    }

    pub async fn save_track(&self, track: &Track) -> Result<(), StateError> {
        self.save_snapshot(&TrackSnapshot::from(track)).await
    }

    pub async fn save_snapshot(&self, snapshot: &TrackSnapshot) -> Result<(), StateError> {
        let bytes = serde_json::to_vec(snapshot)
            .map_err(|_| StateError::Snapshot("Failed to serialize snapshot".to_string()))?;
        self.store.put(CURRENT_TRACK_KEY, &bytes).await
    }

    /// Loads the saved snapshot. Missing or malformed state means "no prior
    /// session": the failure is logged and the caller starts fresh, it is
    /// never fatal to startup.
    pub async fn load_snapshot(&self) -> Option<TrackSnapshot> {
        let bytes = match self.store.get(CURRENT_TRACK_KEY).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                tracing::error!("Failed to read saved track state: {:?}", err);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::error!("Saved track state is malformed, starting fresh: {}", err);
                None
            }
        }
    }

    pub async fn clear(&self) -> Result<(), StateError> {
        self.store.remove(CURRENT_TRACK_KEY).await
    }
}

use std::sync::{Arc, Mutex};

use thiserror::Error;

use quiz_core::AppState;

/// Errors surfaced by snapshot stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Contract for persisting the whole application state as one snapshot.
///
/// Saves are whole-record and last-write-wins; there is no partial update.
/// `load` returns `None` when no snapshot exists yet; callers fall back to
/// defaults, and fields missing from older snapshots default individually at
/// deserialization time.
pub trait SnapshotStore: Send + Sync {
    /// Read the stored snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<AppState>, StorageError>;

    /// Write the whole state, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the state cannot be serialized or written.
    fn save(&self, state: &AppState) -> Result<(), StorageError>;

    /// Remove the snapshot. Succeeds when none exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if removal fails for another reason.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Load a snapshot, falling back to pristine defaults when none is stored.
///
/// # Errors
///
/// Returns `StorageError` if a stored snapshot cannot be read or parsed.
pub fn load_or_default(store: &dyn SnapshotStore) -> Result<AppState, StorageError> {
    Ok(store.load()?.unwrap_or_default())
}

pub(crate) fn encode(state: &AppState) -> Result<String, StorageError> {
    serde_json::to_string(state).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn decode(raw: &str) -> Result<AppState, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// In-memory store for tests and prototyping.
///
/// Holds the serialized form rather than the state itself, so the JSON
/// round-trip is exercised the same way the file store exercises it.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemoryStore {
    fn load(&self) -> Result<Option<AppState>, StorageError> {
        let guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        guard.as_deref().map(decode).transpose()
    }

    fn save(&self, state: &AppState) -> Result<(), StorageError> {
        let encoded = encode(state)?;
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        *guard = Some(encoded);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

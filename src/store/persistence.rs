//! Durable storage for the quiz state.
//!
//! The whole [`Store`] lives under one namespace key. Clearing the key
//! resets every category's progress and the review list.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::models::Store;

/// Namespace key the state is saved under.
pub const DEFAULT_NAMESPACE: &str = "quiz-app-state";

/// Error raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("stored quiz state is not valid: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A key-value slot holding the serialized store.
pub trait StateStorage {
    /// Read the saved state, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<Store>, StorageError>;

    /// Replace the saved state.
    fn save(&mut self, store: &Store) -> Result<(), StorageError>;

    /// Remove the saved state entirely.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Stores the state as a JSON file named after the namespace key.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Use `<dir>/<namespace>.json`.
    pub fn new<P: AsRef<Path>>(dir: P, namespace: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", namespace)),
        }
    }

    /// Use the default namespace inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir, DEFAULT_NAMESPACE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Store>, StorageError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&mut self, store: &Store) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        // Write then rename so a crash mid-write keeps the previous state.
        let json = serde_json::to_string_pretty(store)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Default)]
struct MemorySlot {
    json: Option<String>,
    saves: usize,
    failures: usize,
}

impl MemorySlot {
    fn take_failure(&mut self) -> Result<(), StorageError> {
        if self.failures == 0 {
            return Ok(());
        }
        self.failures -= 1;
        Err(io::Error::other("memory storage is refusing writes").into())
    }
}

/// In-memory storage. Clones share the same slot, so a caller can keep a
/// handle to inspect what a manager wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<MemorySlot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `store` already saved.
    pub fn with_store(store: &Store) -> Result<Self, StorageError> {
        let storage = Self::new();
        storage.slot.borrow_mut().json = Some(serde_json::to_string(store)?);
        Ok(storage)
    }

    /// How many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.slot.borrow().saves
    }

    /// Make the next `count` writes (`save` or `clear`) fail with an I/O
    /// error, leaving the saved document as it was.
    pub fn fail_next_writes(&self, count: usize) {
        self.slot.borrow_mut().failures = count;
    }

    /// The raw saved document, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().json.clone()
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Store>, StorageError> {
        match &self.slot.borrow().json {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, store: &Store) -> Result<(), StorageError> {
        let json = serde_json::to_string(store)?;
        let mut slot = self.slot.borrow_mut();
        slot.take_failure()?;
        slot.json = Some(json);
        slot.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        let mut slot = self.slot.borrow_mut();
        slot.take_failure()?;
        slot.json = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::Progress;

    fn sample_store() -> Store {
        let mut store = Store::default();
        store
            .progress
            .insert("c".to_string(), Progress::new("c", Utc::now()));
        store
    }

    #[test]
    fn test_file_storage_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::in_dir(dir.path());
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_file_storage_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonFileStorage::in_dir(dir.path().join("nested"));
        let store = sample_store();

        storage.save(&store).unwrap();
        assert!(storage.path().ends_with("quiz-app-state.json"));
        assert_eq!(storage.load().unwrap(), Some(store));

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
        storage.clear().unwrap();
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::in_dir(dir.path());
        fs::write(storage.path(), "[1, 2").unwrap();
        assert!(matches!(storage.load(), Err(StorageError::Serialize(_))));
    }

    #[test]
    fn test_memory_storage_shares_slot() {
        let handle = MemoryStorage::new();
        let mut storage = handle.clone();

        storage.save(&sample_store()).unwrap();
        assert_eq!(handle.save_count(), 1);
        assert!(handle.raw().unwrap().contains("\"categoryId\":\"c\""));

        storage.clear().unwrap();
        assert!(handle.load().unwrap().is_none());
    }
}

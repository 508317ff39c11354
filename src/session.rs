//! Session/Identity Store
//!
//! Local persistent key-value state, the desktop counterpart of a browser's
//! `localStorage`, plus the analytics session id kept in it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use uuid::Uuid;

/// Key holding the analytics session id
pub const SESSION_KEY: &str = "citizen_session_id";

/// Key holding the base64 `user:pass` admin credentials
pub const ADMIN_CREDENTIALS_KEY: &str = "admin_creds";

/// Errors raised while persisting local state
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key-value storage that survives restarts
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Store kept only in memory
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        read(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        write(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        write(&self.entries).remove(key);
        Ok(())
    }
}

/// Store persisted as a JSON object in a single file.
///
/// Every mutation rewrites the file.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store, starting empty when the file does not exist yet.
    ///
    /// A corrupt file is logged and treated as empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable store {:?}: {}", path, e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StoreError::Io {
                    path,
                    error: e.to_string(),
                })
            }
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_error = |e: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            error: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content).map_err(io_error)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        read(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = write(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = write(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Hands out the browser-lifetime analytics session id
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Return the persisted session id, creating and persisting one if absent.
    ///
    /// If the id cannot be persisted it is still returned, so the current
    /// run keeps a stable id.
    pub fn get_or_create_session_id(&self) -> String {
        if let Some(existing) = self.store.get(SESSION_KEY).filter(|id| !id.is_empty()) {
            return existing;
        }

        let session_id = generate_session_id();
        if let Err(e) = self.store.set(SESSION_KEY, &session_id) {
            tracing::warn!("Failed to persist session id: {}", e);
        }

        tracing::debug!(session_id = %session_id, "Created analytics session");
        session_id
    }
}

/// `sess_` followed by 9 random lowercase alphanumerics
fn generate_session_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("sess_{}", &random[..9])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_session_id_is_stable() {
        let sessions = SessionStore::new(Arc::new(MemoryStore::new()));
        let first = sessions.get_or_create_session_id();
        let second = sessions.get_or_create_session_id();
        assert_eq!(first, second);
    }

    #[test]
    fn test_session_id_format() {
        let id = generate_session_id();
        assert!(id.starts_with("sess_"));
        assert_eq!(id.len(), 14);
        assert!(id[5..].chars().all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_existing_session_id_is_reused() {
        let store = Arc::new(MemoryStore::new());
        store.set(SESSION_KEY, "sess_fromweb01").unwrap();

        let sessions = SessionStore::new(store);
        assert_eq!(sessions.get_or_create_session_id(), "sess_fromweb01");
    }

    #[test]
    fn test_session_id_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("local_storage.json");

        let first = {
            let store = Arc::new(FileStore::open(&path).unwrap());
            SessionStore::new(store).get_or_create_session_id()
        };

        let reopened = Arc::new(FileStore::open(&path).unwrap());
        assert_eq!(SessionStore::new(reopened).get_or_create_session_id(), first);
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("local_storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set(ADMIN_CREDENTIALS_KEY, "dXNlcjpwYXNz").unwrap();
        store.remove(ADMIN_CREDENTIALS_KEY).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(ADMIN_CREDENTIALS_KEY), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(SESSION_KEY), None);
        assert_eq!(store.path(), path.as_path());
    }
}

//! Persistent session storage.
//!
//! The client persists exactly two values: the raw bearer token under
//! [`TOKEN_KEY`] and a JSON profile snapshot under [`SNAPSHOT_KEY`]. The
//! snapshot is a fallback only; the server profile is authoritative.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use herbiverse_types::{StorageError, UserProfile};
use parking_lot::Mutex;

/// Key of the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key of the JSON profile snapshot.
pub const SNAPSHOT_KEY: &str = "userData";

const SESSION_FILE: &str = "session.json";

/// String key/value store backing the session.
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Stored bearer token; empty strings count as absent.
    fn token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.get(TOKEN_KEY)?.filter(|token| !token.is_empty()))
    }

    /// Persist the bearer token.
    fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.set(TOKEN_KEY, token)
    }

    /// Stored profile snapshot.
    fn snapshot(&self) -> Result<Option<UserProfile>, StorageError> {
        match self.get(SNAPSHOT_KEY)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::from_json_error(SNAPSHOT_KEY, &e)),
        }
    }

    /// Persist a profile snapshot.
    fn save_snapshot(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let raw = serde_json::to_string(profile)
            .map_err(|e| StorageError::from_json_error(SNAPSHOT_KEY, &e))?;
        self.set(SNAPSHOT_KEY, &raw)
    }

    /// Drop the profile snapshot.
    fn clear_snapshot(&self) -> Result<(), StorageError> {
        self.remove(SNAPSHOT_KEY)
    }

    /// Drop token and snapshot. Both removals are attempted; the first
    /// error is returned.
    fn clear_session(&self) -> Result<(), StorageError> {
        let token = self.remove(TOKEN_KEY);
        let snapshot = self.remove(SNAPSHOT_KEY);
        token.and(snapshot)
    }
}

/// Process-local storage, for tests and embedders without persistence.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { entries: Mutex::new(entries) }
    }

    /// Check whether the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// JSON-file storage: one object of string values, rewritten atomically.
///
/// The in-process lock serializes writers; other processes sharing the file
/// race with last-write-wins semantics.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Store at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Store at `session.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SESSION_FILE))
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::from_io_error(&e)),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            key: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Entries for a rewrite. A corrupt file is discarded so logout can
    /// always clear it.
    fn entries_for_update(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_entries() {
            Err(StorageError::Corrupt { message, .. }) => {
                tracing::warn!(
                    "Discarding corrupt session file {}: {}",
                    self.path.display(),
                    message
                );
                Ok(BTreeMap::new())
            },
            other => other,
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::from_io_error(&e))?;
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Io { message: e.to_string() })?;

        // Atomic write
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|e| StorageError::from_io_error(&e))?;
        restrict_permissions(&temp_path)?;
        fs::rename(&temp_path, &self.path).map_err(|e| StorageError::from_io_error(&e))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), StorageError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| StorageError::from_io_error(&e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), StorageError> {
    Ok(())
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.entries_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        if !self.path.exists() {
            return Ok(());
        }
        let mut entries = self.entries_for_update()?;
        entries.remove(key);
        self.write_entries(&entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> UserProfile {
        serde_json::from_value(json!({"name": "Asha", "email": "a@b.com"})).unwrap()
    }

    #[test]
    fn test_memory_snapshot_roundtrip_and_clear() {
        let storage = MemoryStorage::new();
        storage.save_token("T").unwrap();
        storage.save_snapshot(&profile()).unwrap();

        assert_eq!(storage.token().unwrap().as_deref(), Some("T"));
        assert_eq!(storage.snapshot().unwrap(), Some(profile()));

        storage.clear_session().unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_empty_token_is_absent() {
        let storage = MemoryStorage::with_entries([(TOKEN_KEY, "")]);
        assert_eq!(storage.token().unwrap(), None);
    }

    #[test]
    fn test_corrupt_snapshot_is_reported() {
        let storage = MemoryStorage::with_entries([(SNAPSHOT_KEY, "{not json")]);
        let err = storage.snapshot().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref key, .. } if key == SNAPSHOT_KEY));
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let storage = FileStorage::in_dir(dir.path());
        storage.save_token("T").unwrap();
        storage.save_snapshot(&profile()).unwrap();

        let reopened = FileStorage::in_dir(dir.path());
        assert_eq!(reopened.token().unwrap().as_deref(), Some("T"));
        assert_eq!(reopened.snapshot().unwrap(), Some(profile()));

        reopened.clear_session().unwrap();
        assert_eq!(storage.token().unwrap(), None);
        assert_eq!(storage.snapshot().unwrap(), None);
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(&dir.path().join("nested"));

        assert_eq!(storage.token().unwrap(), None);
        storage.clear_session().unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_file_storage_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        fs::write(storage.path(), "garbage").unwrap();

        assert!(storage.token().is_err());
        storage.clear_session().unwrap();
        assert_eq!(storage.token().unwrap(), None);
    }
}

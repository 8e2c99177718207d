//! Key-value store persisted as a single JSON document.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::domain::errors::StorageError;
use crate::domain::ports::KeyValueStorePort;

/// File name of the store inside the data directory.
pub const STORAGE_FILE_NAME: &str = "storage.json";
/// Default quota, matching what browsers grant local storage.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Durable key-value store.
///
/// The whole map is held in memory and rewritten atomically on every change.
pub struct FileKeyValueStore {
    path: PathBuf,
    quota_bytes: usize,
    entries: RwLock<BTreeMap<String, String>>,
}

fn usage(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl FileKeyValueStore {
    /// Opens (or creates) the store in `dir`.
    ///
    /// A malformed file is left in place and the store starts empty.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created or the file cannot be read.
    pub fn open(dir: &Path, quota_bytes: usize) -> Result<Self, StorageError> {
        if !dir.exists() {
            info!("Creating data directory at {:?}", dir);
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(STORAGE_FILE_NAME);

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Failed to parse storage file: {}. Starting empty.", e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = entries.len(), "Opened key-value store");

        Ok(Self {
            path,
            quota_bytes,
            entries: RwLock::new(entries),
        })
    }

    /// Returns the file backing this store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns bytes currently used by keys and values.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        usage(&self.entries.read())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::serialization(STORAGE_FILE_NAME, e))?;

        let parent = self
            .path
            .parent()
            .ok_or_else(|| std::io::Error::other("Invalid path"))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}

impl KeyValueStorePort for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();

        let current = usage(&entries);
        let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
        let required = key.len() + value.len();
        let available = self.quota_bytes.saturating_sub(current - replaced);
        if required > available {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                required,
                available,
            });
        }

        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&entries) {
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.persist(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for FileKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKeyValueStore")
            .field("path", &self.path)
            .field("quota_bytes", &self.quota_bytes)
            .field("used_bytes", &self.used_bytes())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_values_survive_reopen() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        {
            let store = FileKeyValueStore::open(dir.path(), DEFAULT_QUOTA_BYTES)?;
            store.set("blog-draft-new", "{\"title\":\"x\"}")?;
        }

        let store = FileKeyValueStore::open(dir.path(), DEFAULT_QUOTA_BYTES)?;
        assert_eq!(
            store.get("blog-draft-new")?.as_deref(),
            Some("{\"title\":\"x\"}")
        );
        Ok(())
    }

    #[test]
    fn test_remove_missing_key_is_ok() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let store = FileKeyValueStore::open(dir.path(), DEFAULT_QUOTA_BYTES)?;
        store.remove("absent")?;
        store.set("a", "1")?;
        store.remove("a")?;
        assert!(store.get("a")?.is_none());
        assert!(store.keys().is_empty());
        Ok(())
    }

    #[test]
    fn test_quota_rejects_oversized_write() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let store = FileKeyValueStore::open(dir.path(), 16)?;
        store.set("k", "0123456789")?;

        assert_eq!(store.used_bytes(), 11);

        let err = store.set("other", "0123456789").expect_err("over quota");
        assert!(err.is_quota());
        assert!(store.get("other")?.is_none());
        assert_eq!(store.used_bytes(), 11);

        store.set("k", "01234567890123")?;
        assert_eq!(store.used_bytes(), 15);
        Ok(())
    }

    #[test]
    fn test_malformed_file_starts_empty() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join(STORAGE_FILE_NAME), "{not json")?;
        let store = FileKeyValueStore::open(dir.path(), DEFAULT_QUOTA_BYTES)?;
        assert!(store.keys().is_empty());
        Ok(())
    }
}

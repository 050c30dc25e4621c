//! Storage port and its local keyed-store adapter.
//!
//! `Storage` is the capability the task store persists through. The only
//! backend today is `LocalStorageAdapter`, which keeps the whole collection
//! as one JSON array under a single key of a `LocalStorage` directory.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use crate::task::StoredRecord;

/// Key the task collection is stored under. Bump it for incompatible
/// schema changes; old data is left in place and not migrated.
pub const STORAGE_KEY: &str = "sd_tasks_v4";

/// Errors raised while writing to storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write storage key '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },
}

/// Save/load capability for the task collection.
pub trait Storage {
    /// Replace the stored collection with `records`.
    fn save(&mut self, records: &[StoredRecord]) -> Result<(), StorageError>;

    /// Read the stored collection. Missing or unreadable data yields an
    /// empty collection.
    fn load(&mut self) -> Vec<StoredRecord>;
}

/// Keyed text store backed by a directory, one file per key.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(LocalStorage { dir })
    }

    /// File path holding the value of `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    /// Read the value stored under `key`, `None` if it was never set.
    pub fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let mut buf = String::new();
        File::open(&path)?.read_to_string(&mut buf)?;
        Ok(Some(buf))
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        // Atomic-ish write via temp + rename.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(value.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Delete the value stored under `key`, if any.
    #[cfg(test)]
    pub fn remove_item(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Map a storage key to a safe file stem.
/// Keeps alphanumerics, `-` and `_`; everything else becomes `_`.
pub fn sanitize_key(key: &str) -> String {
    let stem: String = key
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "_".to_string()
    } else {
        stem
    }
}

/// `Storage` that keeps the collection as one JSON array under one key.
#[derive(Debug, Clone)]
pub struct LocalStorageAdapter {
    storage: LocalStorage,
    key: String,
}

impl LocalStorageAdapter {
    pub fn new(storage: LocalStorage, key: impl Into<String>) -> Self {
        LocalStorageAdapter {
            storage,
            key: key.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.storage.path_for(&self.key)
    }
}

impl Storage for LocalStorageAdapter {
    fn save(&mut self, records: &[StoredRecord]) -> Result<(), StorageError> {
        let data = serde_json::to_string(records)?;
        self.storage
            .set_item(&self.key, &data)
            .map_err(|source| StorageError::Write {
                key: self.key.clone(),
                source,
            })?;
        debug!(key = %self.key, count = records.len(), "saved tasks");
        Ok(())
    }

    fn load(&mut self) -> Vec<StoredRecord> {
        let text = match self.storage.get_item(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!(key = %self.key, "no stored tasks, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "error reading stored tasks, starting fresh");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<StoredRecord>>(&text) {
            Ok(records) => {
                debug!(key = %self.key, count = records.len(), "loaded tasks");
                records
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "error parsing stored tasks, starting fresh");
                Vec::new()
            }
        }
    }
}

/// In-memory `Storage` for tests. Counts saves and can be told to fail.
#[cfg(test)]
pub mod memory {
    use super::*;

    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        pub saved: Option<Vec<StoredRecord>>,
        pub save_calls: usize,
        pub fail_saves: bool,
    }

    impl Storage for MemoryStorage {
        fn save(&mut self, records: &[StoredRecord]) -> Result<(), StorageError> {
            self.save_calls += 1;
            if self.fail_saves {
                return Err(StorageError::Write {
                    key: STORAGE_KEY.to_string(),
                    source: io::Error::new(io::ErrorKind::Other, "quota exceeded"),
                });
            }
            self.saved = Some(records.to_vec());
            Ok(())
        }

        fn load(&mut self) -> Vec<StoredRecord> {
            self.saved.clone().unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use crate::task::Task;
    use std::path::Path;

    fn adapter(dir: &Path) -> LocalStorageAdapter {
        LocalStorageAdapter::new(LocalStorage::open(dir).unwrap(), STORAGE_KEY)
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(adapter(dir.path()).load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            Task::new("A", "2026-10-20", Priority::High, 10, "").to_record(),
            Task::new("B", "", Priority::Low, 90, "note").to_record(),
        ];
        adapter(dir.path()).save(&records).unwrap();
        assert_eq!(adapter(dir.path()).load(), records);
    }

    #[test]
    fn test_save_overwrites_whole_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = adapter(dir.path());
        a.save(&[Task::new("A", "", Priority::High, 0, "").to_record()]).unwrap();
        a.save(&[]).unwrap();
        assert!(a.load().is_empty());
        let raw = a.storage.get_item(STORAGE_KEY).unwrap().unwrap();
        assert_eq!(raw, "[]");
    }

    #[test]
    fn test_corrupt_value_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = adapter(dir.path());
        a.storage.set_item(STORAGE_KEY, "{not json").unwrap();
        assert!(a.load().is_empty());

        a.storage.set_item(STORAGE_KEY, r#"{"title":"not an array"}"#).unwrap();
        assert!(a.load().is_empty());
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        storage.set_item("sd_tasks_v3", "old").unwrap();
        storage.set_item(STORAGE_KEY, "new").unwrap();
        assert_eq!(storage.get_item("sd_tasks_v3").unwrap().as_deref(), Some("old"));
        assert_eq!(storage.get_item(STORAGE_KEY).unwrap().as_deref(), Some("new"));
        assert_eq!(storage.get_item("sd_tasks_v2").unwrap(), None);

        storage.remove_item("sd_tasks_v3").unwrap();
        storage.remove_item("sd_tasks_v3").unwrap();
        assert_eq!(storage.get_item("sd_tasks_v3").unwrap(), None);
        assert_eq!(storage.get_item(STORAGE_KEY).unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("sd_tasks_v4"), "sd_tasks_v4");
        assert_eq!(sanitize_key("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_key("  "), "_");
    }
}

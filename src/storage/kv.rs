//! Key-value store backends.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::StorageError;

/// String key-value storage with local-storage semantics.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object file, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file starts empty; an unreadable
    /// or malformed file also starts empty and is overwritten on the next
    /// write.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!(
                        "STORE_FILE_CORRUPT path={} error={}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!(
                    "STORE_FILE_UNREADABLE path={} error={}",
                    path.display(),
                    e
                );
                BTreeMap::new()
            }
        };

        log::debug!(
            "STORE_FILE_OPENED path={} keys={}",
            path.display(),
            entries.len()
        );

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&entries) {
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            log::warn!("STORE_WRITE_FAILED path={} key={} error={}", self.path.display(), key, e);
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock();
        if let Some(old) = entries.remove(key) {
            if let Err(e) = self.flush(&entries) {
                entries.insert(key.to_string(), old);
                log::warn!("STORE_WRITE_FAILED path={} key={} error={}", self.path.display(), key, e);
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("consent-given", "true").unwrap();
        assert_eq!(store.get("consent-given").as_deref(), Some("true"));

        store.remove("consent-given").unwrap();
        store.remove("consent-given").unwrap();
        assert_eq!(store.get("consent-given"), None);
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");

        let store = JsonFileStore::open(&path);
        store.set("demo-user", r#"{"email":"a@x.com","isLoggedIn":true}"#).unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(
            reopened.get("demo-user").as_deref(),
            Some(r#"{"email":"a@x.com","isLoggedIn":true}"#)
        );

        reopened.remove("demo-user").unwrap();
        let again = JsonFileStore::open(&path);
        assert_eq!(again.get("demo-user"), None);
    }

    #[test]
    fn test_file_store_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");
        let store = JsonFileStore::open(&path);
        store.set("consent-given", "true").unwrap();

        // a directory in place of the file makes every flush fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(store.set("consent-given", "false").is_err());
        assert!(store.set("demo-user", "{}").is_err());
        assert!(store.remove("consent-given").is_err());

        assert_eq!(store.get("consent-given").as_deref(), Some("true"));
        assert_eq!(store.get("demo-user"), None);
    }

    #[test]
    fn test_file_store_starts_empty_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json{").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("anything"), None);
        store.set("k", "v").unwrap();
        assert_eq!(JsonFileStore::open(&path).get("k").as_deref(), Some("v"));
    }
}

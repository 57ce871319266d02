//! JSON blobs in key-value storage.
//!
//! Reads are a parse-and-validate step that yields a [`StoredValue`]. A
//! corrupt value is never partially recovered: callers go through
//! [`load_or_clear`], which deletes the offending key and reports absence.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;
use crate::logging::structured::LogContext;

use super::kv::KeyValueStore;

/// Outcome of reading a JSON blob.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue<T> {
    Valid(T),
    Absent,
    Corrupt(String),
}

impl<T> StoredValue<T> {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoredValue::Corrupt(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            StoredValue::Valid(value) => Some(value),
            StoredValue::Absent | StoredValue::Corrupt(_) => None,
        }
    }
}

/// Parse the blob at `key` and run `validate` over it.
pub fn read_json<T, F>(store: &dyn KeyValueStore, key: &str, validate: F) -> StoredValue<T>
where
    T: DeserializeOwned,
    F: FnOnce(&T) -> Result<(), String>,
{
    let Some(raw) = store.get(key) else {
        return StoredValue::Absent;
    };

    let value: T = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => return StoredValue::Corrupt(format!("JSON parse error: {}", e)),
    };

    match validate(&value) {
        Ok(()) => StoredValue::Valid(value),
        Err(reason) => StoredValue::Corrupt(reason),
    }
}

/// Read a blob, clearing the key if it is corrupt.
pub fn load_or_clear<T, F>(
    store: &dyn KeyValueStore,
    key: &str,
    validate: F,
    ctx: &LogContext,
) -> Option<T>
where
    T: DeserializeOwned,
    F: FnOnce(&T) -> Result<(), String>,
{
    match read_json(store, key, validate) {
        StoredValue::Valid(value) => Some(value),
        StoredValue::Absent => None,
        StoredValue::Corrupt(reason) => {
            log::warn!("{} STORAGE_CORRUPT key={} reason={}", ctx, key, reason);
            if let Err(e) = store.remove(key) {
                log::error!("{} STORAGE_CLEAR_FAILED key={} error={}", ctx, key, e);
            }
            None
        }
    }
}

pub fn write_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

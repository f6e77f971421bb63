//! Process-wide key-value storage that survives across sessions.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use filehop_core::NavError;

/// Key-value storage with JSON values.
///
/// `set` persists before returning, so a read that follows sees the write.
pub trait KeyValueStore {
    /// Raw value stored under `key`.
    fn get_raw(&self, key: &str) -> Option<Value>;

    /// Store a raw value under `key`.
    fn set_raw(&mut self, key: &str, value: Value) -> Result<(), NavError>;

    /// Typed value under `key`, or `default` if missing or malformed.
    fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T
    where
        Self: Sized,
    {
        match self.get_raw(key) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(key, error = %e, "Stored value has unexpected shape");
                default
            }),
            None => default,
        }
    }

    /// Serialize and store `value` under `key`.
    fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), NavError>
    where
        Self: Sized,
    {
        let value = serde_json::to_value(value).map_err(|e| NavError::other(e.to_string()))?;
        self.set_raw(key, value)
    }
}

/// In-memory store, used when no data directory is available and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: Value) -> Result<(), NavError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl FileStore {
    /// Default location: `<data dir>/filehop/state.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("filehop").join("state.json"))
    }

    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt state file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read state file");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), keys = values.len(), "Opened state file");
        Self { path, values }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), NavError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| NavError::io(parent, e))?;
        }
        let text = serde_json::to_string_pretty(&self.values)
            .map_err(|e| NavError::other(e.to_string()))?;
        // Write then rename.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(|e| NavError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| NavError::io(&self.path, e))
    }
}

impl KeyValueStore for FileStore {
    fn get_raw(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: Value) -> Result<(), NavError> {
        self.values.insert(key.to_string(), value);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_memory_store_typed() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_or::<Vec<u32>>("k", vec![]), Vec::<u32>::new());
        store.set("k", &vec![1u32, 2]).unwrap();
        assert_eq!(store.get_or::<Vec<u32>>("k", vec![]), vec![1, 2]);
    }

    #[test]
    fn test_malformed_value_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.set_raw("k", Value::String("nope".into())).unwrap();
        assert_eq!(store.get_or::<Vec<u32>>("k", vec![7]), vec![7]);
    }

    #[test]
    fn test_file_store_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/state.json");

        let mut store = FileStore::open(&path);
        store.set("greeting", &"hello").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get_or("greeting", String::new()), "hello");
    }

    #[test]
    fn test_file_store_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert!(store.get_raw("anything").is_none());
    }
}

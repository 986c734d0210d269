//! File-backed key-value store for small local state.
//!
//! Backs theme preference and the auth artifacts (tokens, user info). One
//! JSON object per store file under the platform config directory. An
//! absent key is a normal `None`, never an error. The store is constructed
//! explicitly and passed by reference; there is no ambient global instance.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::StorageError;

pub struct KvStore {
    path: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl KvStore {
    /// Open (or create) a store at the given path.
    ///
    /// A corrupt store file is logged and replaced with an empty map rather
    /// than failing open; losing a token cache is recoverable, refusing to
    /// start is not.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        }

        let cache = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|e| StorageError::ReadFailed(e.to_string()))?;
            match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!("Ignoring corrupt store at {:?}: {}", path, e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        Ok(Self { path, cache: Mutex::new(cache) })
    }

    /// Default store location under the platform config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dayview")
            .join("store.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a value. Absent keys return `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.cache.lock().get(key).cloned()
    }

    /// Write a value and persist the store.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut cache = self.cache.lock();
        cache.insert(key.to_string(), value.to_string());
        self.persist(&cache)
    }

    /// Remove several keys at once and persist. Missing keys are fine.
    pub fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut cache = self.cache.lock();
        for key in keys {
            cache.remove(*key);
        }
        self.persist(&cache)
    }

    fn persist(&self, cache: &HashMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(cache)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StorageError::WriteFailed(e.to_string()))
    }
}

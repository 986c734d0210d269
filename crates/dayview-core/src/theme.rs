//! Theme preference, persisted through the key-value store.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::kv::KvStore;

const THEME_KEY: &str = "theme_mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Load the persisted preference; absent or unrecognized values fall
    /// back to light.
    pub fn load(store: &KvStore) -> Self {
        match store.get(THEME_KEY).as_deref() {
            Some("dark") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    pub fn store(self, store: &KvStore) -> Result<(), StorageError> {
        store.set(THEME_KEY, self.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_roundtrip_and_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStore::open(dir.path().join("store.json")).unwrap();

        assert_eq!(ThemeMode::load(&store), ThemeMode::Light);
        ThemeMode::Dark.store(&store).unwrap();
        assert_eq!(ThemeMode::load(&store), ThemeMode::Dark);
    }

    #[test]
    fn test_garbage_value_falls_back_to_light() {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStore::open(dir.path().join("store.json")).unwrap();
        store.set("theme_mode", "solarized").unwrap();
        assert_eq!(ThemeMode::load(&store), ThemeMode::Light);
    }
}

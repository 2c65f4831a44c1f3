//! Preference storage
//!
//! A flat string key-value store injected into the app. The file backend keeps
//! everything in one small TOML table next to the config file.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not find config directory")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),
}

pub trait KeyValueStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Preferences persisted to `preferences.toml`
#[derive(Debug)]
pub struct TomlStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlStore {
    /// Store in the application's config directory
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = crate::config::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::open(dir.join("preferences.toml")))
    }

    /// Open a store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!("Failed to parse preferences at {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read preferences at {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let content = toml::to_string(values)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for TomlStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        // Memory only changes once the file has the new value
        let mut next = self.values.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        self.values = next;
        tracing::debug!(key, value, "preference saved");
        Ok(())
    }
}

/// Non-persistent store, used when no config directory exists and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("tierslide-test-{}-{}", std::process::id(), name))
            .join("preferences.toml")
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.read("theme"), None);
        store.write("theme", "dark").unwrap();
        assert_eq!(store.read("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_toml_store_persists() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        let mut store = TomlStore::open(&path);
        assert_eq!(store.read("theme"), None);
        store.write("theme", "dark").unwrap();
        store.write("billing", "yearly").unwrap();

        let reopened = TomlStore::open(&path);
        assert_eq!(reopened.read("theme").as_deref(), Some("dark"));
        assert_eq!(reopened.read("billing").as_deref(), Some("yearly"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_failed_write_is_retried() {
        let path = temp_path("retry");
        let dir = path.parent().unwrap().to_path_buf();
        let _ = std::fs::remove_dir_all(&dir);
        // a regular file where the directory should be
        std::fs::write(&dir, "blocker").unwrap();

        let mut store = TomlStore::open(&path);
        assert!(store.write("theme", "dark").is_err());
        assert_eq!(store.read("theme"), None);

        std::fs::remove_file(&dir).unwrap();
        store.write("theme", "dark").unwrap();
        assert!(path.exists());

        let reopened = TomlStore::open(&path);
        assert_eq!(reopened.read("theme").as_deref(), Some("dark"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_toml_store_ignores_garbage() {
        let path = temp_path("garbage");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "this is = = not toml").unwrap();

        let store = TomlStore::open(&path);
        assert_eq!(store.read("theme"), None);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}

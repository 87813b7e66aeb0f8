//! Key-value storage backends for the persisted session

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::SessionResult;

/// Read access to a persisted key-value store
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
}

/// In-memory storage. Writable so hosts and tests can log a user in.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_item(&self, key: &str, value: impl Into<String>) {
        self.items.write().insert(key.to_string(), value.into());
    }

    pub fn remove_item(&self, key: &str) {
        self.items.write().remove(key);
    }

    pub fn clear(&self) {
        self.items.write().clear();
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().get(key).cloned()
    }
}

/// Storage persisted as a flat JSON object in a file, re-read on every access
/// so that changes made by the host are picked up.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's local data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|p| p.join("billed").join("storage.json"))
            .unwrap_or_else(|| PathBuf::from("./billed_storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every entry. A missing file is an empty store.
    pub fn load(&self) -> SessionResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut items) => items.remove(key),
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Failed to read session storage");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.set_item("user", "x");
        assert_eq!(storage.get_item("user").as_deref(), Some("x"));

        storage.remove_item("user");
        assert!(storage.get_item("user").is_none());
    }

    #[test]
    fn test_file_storage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let storage = FileStorage::new(&path);

        assert!(storage.get_item("user").is_none());

        std::fs::write(&path, r#"{"user": "{\"type\":\"Admin\"}"}"#).unwrap();
        assert_eq!(storage.get_item("user").as_deref(), Some(r#"{"type":"Admin"}"#));
    }

    #[test]
    fn test_file_storage_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.load().is_err());
        assert!(storage.get_item("user").is_none());
    }
}

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::errors::CoreError;

/// String key-value seam — the browser-local-storage analog.
///
/// Hosts hand the facade whichever backend fits their platform; the
/// library only ever reads and writes whole string values under fixed
/// keys.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Absence is not an error.
    fn get(&self, key: &str) -> Option<String>;

    /// Write (or overwrite) a value.
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// In-memory backend: the test double, and the stand-in where no real
/// local storage exists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        debug!(key, len = value.len(), "memory store write");
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store (native only): a single JSON object mapping keys to
/// string values, rewritten on every set.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> HashMap<String, String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_entries().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.read_entries();
        entries.insert(key.to_string(), value.to_string());
        let raw = serde_json::to_string(&entries)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        debug!(key, path = %self.path.display(), "file store write");
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

//! Persistent key/value store for license state
//!
//! The engine is the only writer. Two implementations:
//! - `MemoryStore`: in-memory, for tests and ephemeral hosts
//! - `FileStore`: a single JSON object on disk, rewritten on every change

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Logical keys of the persisted license state.
pub mod keys {
    pub const LICENSE_KEY: &str = "license_key";
    pub const INSTANCE_ID: &str = "instance_id";
    pub const STORED_LICENSE_INFO: &str = "stored_license_info";
    pub const LAST_ONLINE: &str = "last_online_timestamp";
    pub const OFFLINE_START: &str = "offline_start_timestamp";
    pub const TEMPORARILY_DISABLED: &str = "isPremiumTemporarilyDisabled";
    pub const EXPIRED: &str = "isExpired";
    pub const NOTIFICATION_SHOWN: &str = "expirationNotificationShown";
}

const STATE_FILENAME: &str = "state.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Abstract durable key/value surface.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Forces pending state to durable storage. Write-through stores have
    /// nothing to do.
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Typed helpers over any `KeyValueStore`.
pub trait KeyValueStoreExt: KeyValueStore {
    /// Reads `key`, falling back to `default` when absent or of the wrong shape.
    fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_typed(key).unwrap_or(default)
    }

    fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring malformed stored value");
                None
            }
        }
    }

    fn set_typed<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        self.set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

/// In-memory store backed by a `HashMap`
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// JSON-file store. Writes through on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Map::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, values })
    }

    /// Returns `<config dir>/textpro/state.json`.
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("textpro").join(STATE_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        if self.values.get(key) == Some(&value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value);
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_none() {
            return Ok(());
        }
        self.persist()
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.persist()
    }
}

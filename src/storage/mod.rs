//! Durable client-side key/value storage.
//!
//! The client keeps a single credential between sessions. It goes through
//! [`KeyValueStore`] so the controller never touches the filesystem directly.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Key under which the access key is persisted.
pub const ACCESS_KEY_ENTRY: &str = "vortex_access_key";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    #[error("failed to access storage: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to deserialize storage: {0}")]
    DeserializeError(#[from] toml::de::Error),
    #[error("failed to serialize storage: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// String map kept in a TOML file, rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens `storage.toml` under the platform data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        let dirs = crate::config::project_dirs().ok_or(StorageError::DirectoriesNotFound)?;
        Self::open(dirs.data_dir().join("storage.toml"))
    }

    /// A missing file is an empty store; it is created on the first write.
    /// An unreadable one is treated the same way and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            match toml::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        "discarding unreadable key store {}: {}",
                        path.display(),
                        StorageError::from(e)
                    );
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!("opened key store at {}", path.display());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a sibling `.toml.tmp` and renames it over the store; readers
    /// only ever see a complete file.
    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(&self.entries)?;
        let temp_path = self.path.with_extension("toml.tmp");
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Non-durable store, used when no data directory is available.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

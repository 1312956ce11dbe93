//! Key-value persistence for profile scalars
//!
//! Features:
//! - Flat JSON object of integers in `~/.skyline-strike/`
//! - Writes go to a temp file, then rename over the store
//! - In-memory store for tests and headless runs

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from the persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed store file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scalar key-value storage
pub trait KvStore {
    fn load(&self, key: &str) -> Option<u64>;
    fn save(&mut self, key: &str, value: u64) -> Result<(), StoreError>;
}

/// Get the ~/.skyline-strike/ directory path, creating it if needed.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
    let dir = home.join(".skyline-strike");
    fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Store backed by a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, u64>,
}

impl JsonFileStore {
    pub const FILE_NAME: &'static str = "profile.json";

    /// Open the profile in the default data directory
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(data_dir()?.join(Self::FILE_NAME))
    }

    /// Open (or start) a store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values: BTreeMap<String, u64> = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        log::info!("Opened profile store at {} ({} keys)", path.display(), values.len());
        Ok(Self { path, values })
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KvStore for JsonFileStore {
    fn load(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn save(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn load(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn save(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

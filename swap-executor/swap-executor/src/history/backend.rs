//! Key-value storage backends for the swap history

use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;

use super::error::HistoryError;

/// A string key-value store
#[async_trait]
pub trait HistoryBackend: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn read(&self, key: &str) -> Result<Option<String>, HistoryError>;

    /// Store `value` under `key`, replacing any existing value
    async fn write(&self, key: &str, value: &str) -> Result<(), HistoryError>;

    /// Remove the value stored under `key`
    async fn remove(&self, key: &str) -> Result<(), HistoryError>;
}

// ----------------
// | File Backend |
// ----------------

/// Stores each key as a JSON file in a data directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    /// The data directory
    dir: PathBuf,
}

impl FileBackend {
    /// Constructor, the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The path of the file backing `key`
    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl HistoryBackend for FileBackend {
    async fn read(&self, key: &str) -> Result<Option<String>, HistoryError> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HistoryError::storage(e)),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), HistoryError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(HistoryError::storage)?;

        // Write then rename so readers never observe a partial file
        let path = self.path(key);
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, value).await.map_err(HistoryError::storage)?;
        tokio::fs::rename(&tmp_path, &path).await.map_err(HistoryError::storage)
    }

    async fn remove(&self, key: &str) -> Result<(), HistoryError> {
        match tokio::fs::remove_file(self.path(key)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(HistoryError::storage(e)),
            _ => Ok(()),
        }
    }
}

// ------------------
// | Memory Backend |
// ------------------

/// Holds values in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryBackend {
    /// The stored values
    values: DashMap<String, String>,
}

#[async_trait]
impl HistoryBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<String>, HistoryError> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), HistoryError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), HistoryError> {
        self.values.remove(key);
        Ok(())
    }
}

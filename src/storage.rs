use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("I/O error: {0}")]
    GenericIo(#[from] io::Error),
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Durable string blobs addressed by key. Writes replace the whole value.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local store, used for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
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

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

fn map_io_error(path: &Path, e: io::Error) -> StorageError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(path.display().to_string()),
        _ => StorageError::GenericIo(e),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(&path, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| map_io_error(&self.dir, e))?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| map_io_error(&path, e))?;
        file.write_all(value.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path().join("nested"));

        assert_eq!(store.get("aimindmap_data").unwrap(), None);
        store.set("aimindmap_data", "{\"a\":1}").unwrap();
        assert_eq!(store.get("aimindmap_data").unwrap().as_deref(), Some("{\"a\":1}"));

        let on_disk = temp_dir.path().join("nested").join("aimindmap_data.json");
        assert!(on_disk.exists());
    }

    #[test]
    fn test_file_store_overwrites_whole_blob() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());

        store.set("key", "a much longer first value").unwrap();
        store.set("key", "short").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn test_file_store_rejects_bad_keys() {
        let store = FileStore::new("/tmp");
        assert!(matches!(store.path_for("../etc/passwd"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.path_for(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.path_for(".hidden"), Err(StorageError::InvalidKey(_))));
        assert!(store.path_for("aimindmap_data").is_ok());
    }
}

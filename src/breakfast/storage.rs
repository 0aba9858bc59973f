use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unable to read storage file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("unable to write storage file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("storage file {} is not a JSON object of strings: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("unable to encode storage entries: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait KeyValueStorage: Send {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(err @ StorageError::Corrupt { .. }) => {
                warn!("replacing unreadable storage contents: {err}");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        entries.insert(key.to_string(), value.to_string());

        let text = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, format!("{text}\n")).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_file_has_no_entries() {
        let dir = tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().join("absent.json"));
        assert_eq!(storage.get_item("breakfast-time").expect("read"), None);
    }

    #[test]
    fn set_item_keeps_other_keys() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{ "theme": "dark" }"#).expect("seed file");

        let mut storage = FileStorage::new(&path);
        storage
            .set_item("breakfast-time", r#"{"hour":7,"minute":15}"#)
            .expect("write");

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get_item("theme").expect("read").as_deref(),
            Some("dark")
        );
        assert_eq!(
            reopened.get_item("breakfast-time").expect("read").as_deref(),
            Some(r#"{"hour":7,"minute":15}"#)
        );
    }

    #[test]
    fn corrupt_file_is_reported_on_read_and_replaced_on_write() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        fs::write(&path, "{ not-valid-json ").expect("seed file");

        let mut storage = FileStorage::new(&path);
        let err = storage.get_item("breakfast-time").expect_err("corrupt");
        assert!(err.to_string().contains("not a JSON object"));

        storage.set_item("breakfast-time", "x").expect("overwrite");
        assert_eq!(
            storage.get_item("breakfast-time").expect("read").as_deref(),
            Some("x")
        );
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempdir().expect("tempdir");
        let mut storage = FileStorage::new(dir.path().join("nope").join("storage.json"));
        let err = storage.set_item("k", "v").expect_err("no parent dir");
        assert!(matches!(err, StorageError::Write { .. }));
    }
}

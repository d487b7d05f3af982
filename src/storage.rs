use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key/value persistence backend. Both calls may block on I/O.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Stores each key as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn ensure_dirs(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let invalid = key.is_empty()
            || key == "."
            || key.contains("..")
            || key.contains(['/', '\\']);
        if invalid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }

    fn write_atomic(&self, path: PathBuf, bytes: &[u8]) -> Result<(), StorageError> {
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        Ok(Some(buf))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        self.write_atomic(path, value.as_bytes())
    }
}

/// Process-local backend; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert!(store.get("tasks").unwrap().is_none());
    }

    #[test]
    fn file_store_set_then_get_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        store.ensure_dirs().unwrap();

        store.set("tasks", "[]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("nested").join("tasks.json").is_file());
        // The temp file is renamed into place.
        assert!(!dir.path().join("nested").join("tasks.tmp").exists());

        store.set("tasks", "[1]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        for key in ["", ".", "../escape", "a/b", "a\\b"] {
            assert!(matches!(
                store.set(key, "x"),
                Err(StorageError::InvalidKey(_))
            ));
            assert!(matches!(store.get(key), Err(StorageError::InvalidKey(_))));
        }
    }

    #[test]
    fn file_store_surfaces_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());

        // A directory where the data file is expected makes both read and write fail.
        fs::create_dir_all(dir.path().join("tasks.json")).unwrap();
        assert!(matches!(store.set("tasks", "[]"), Err(StorageError::Io(_))));
        assert!(matches!(store.get("tasks"), Err(StorageError::Io(_))));

        // A file where the root directory is expected.
        let file_root = dir.path().join("not-a-dir");
        fs::write(&file_root, b"x").unwrap();
        let store = FileStore::new(file_root);
        assert!(store.ensure_dirs().is_err());
    }

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        assert!(store.get("tasks").unwrap().is_none());
        store.set("tasks", "[]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));

        let by_ref: &MemoryStore = &store;
        by_ref.set("tasks", "[2]").unwrap();
        assert_eq!((&store).get("tasks").unwrap().as_deref(), Some("[2]"));
    }
}

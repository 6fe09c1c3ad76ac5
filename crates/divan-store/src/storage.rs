//! Key/value persistence behind the client-local stores.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::StoreError;

/// String-valued persistent storage, one value per key.
pub trait Storage: Send + Sync {
    /// Returns `None` when the key has never been written or was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing medium cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the value cannot be persisted.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing medium refuses the removal.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside a data directory.
///
/// Writes go to a uniquely named temporary sibling first and are renamed
/// into place, so a reader never sees a half-written file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Unique per write, so concurrent writers never share a temporary file and
/// the last rename wins.
fn temp_name(key: &str) -> String {
    format!(
        ".{key}.json.{}-{:08x}.tmp",
        std::process::id(),
        rand::random::<u32>()
    )
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let tmp = self.dir.join(temp_name(key));
        fs::write(&tmp, value).map_err(io_error(&tmp))?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(&path)(e));
        }
        tracing::debug!(key, path = %path.display(), "storage write");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path)(e)),
        }
    }
}

/// In-process storage for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!(
            "divan-store-{name}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn file_storage_round_trips_and_removes() {
        let dir = scratch_dir("roundtrip");
        let storage = FileStorage::new(&dir);

        assert_eq!(storage.read("cart").unwrap(), None);
        storage.write("cart", "[1,2]").unwrap();
        assert_eq!(storage.read("cart").unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.join("cart.json").exists());
        let leftovers = fs::read_dir(&dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);

        storage.write("cart", "[]").unwrap();
        assert_eq!(storage.read("cart").unwrap().as_deref(), Some("[]"));

        storage.remove("cart").unwrap();
        storage.remove("cart").unwrap();
        assert_eq!(storage.read("cart").unwrap(), None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn temp_names_differ_between_writes() {
        let a = temp_name("cart");
        let b = temp_name("cart");
        assert!(a.starts_with(".cart.json."));
        assert!(a.contains(&std::process::id().to_string()));
        assert_ne!(a, b);
    }

    #[test]
    fn concurrent_writers_all_succeed() {
        let dir = scratch_dir("concurrent");
        let storage = std::sync::Arc::new(FileStorage::new(&dir));
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let storage = std::sync::Arc::clone(&storage);
                std::thread::spawn(move || storage.write("favorites", &format!("[{n}]")))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        let stored = storage.read("favorites").unwrap().unwrap();
        assert!(stored.starts_with('[') && stored.ends_with(']'));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let storage = FileStorage::new(scratch_dir("keys"));
        assert!(matches!(
            storage.write("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(storage.read(""), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryStorage::new();
        storage.write("token", "demo-token").unwrap();
        assert_eq!(storage.read("token").unwrap().as_deref(), Some("demo-token"));
        storage.remove("token").unwrap();
        assert_eq!(storage.read("token").unwrap(), None);
    }
}

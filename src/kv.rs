//! Local key-value storage.
//!
//! Values are opaque byte blobs addressed by a string key. The file backend
//! keeps one file per key inside a data directory:
//!
//! ```text
//! <data_dir>/
//!   todo-20200101.json        # serialized task list
//!   todo-20200101.json.lock   # advisory lock for single writes
//!   todo-20200101.lock        # held for a whole read-modify-write
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// Blocking key-value storage. Callers run it off the async executor.
pub trait KvStore: Send + Sync + 'static {
    /// Stored value for `key`, or `None` when nothing was ever written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the value for `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Reject keys that could escape the data directory.
pub fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(Error::InvalidConfig("storage key cannot be empty".to_string()));
    }
    if key.contains(['/', '\\']) || key == "." || key.contains("..") {
        return Err(Error::InvalidConfig(format!(
            "storage key '{key}' must not contain path separators or '..'"
        )));
    }
    Ok(())
}

/// One JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
    lock_timeout_ms: u64,
}

impl FileKvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Hold `key` exclusively until the guard drops.
    ///
    /// Separate from the per-write lock, so `get`/`set` keep working for the
    /// holder.
    pub fn lock_key(&self, key: &str) -> Result<FileLock> {
        validate_key(key)?;
        FileLock::acquire(self.dir.join(format!("{key}.lock")), self.lock_timeout_ms)
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        lock::read_locked(self.path_for(key), self.lock_timeout_ms)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        validate_key(key)?;
        lock::write_atomic_locked(self.path_for(key), value, self.lock_timeout_ms)
    }
}

/// In-process storage, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing any serialization.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.into(), value.into());
        }
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| Error::OperationFailed("memory store poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::OperationFailed("memory store poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKvStore::new(temp_dir.path().join("data"));

        assert!(store.get("todo-20200101").unwrap().is_none());

        store.set("todo-20200101", b"[]").unwrap();
        assert_eq!(store.get("todo-20200101").unwrap(), Some(b"[]".to_vec()));
        assert!(store.path_for("todo-20200101").exists());

        store.set("todo-20200101", b"[1]").unwrap();
        assert_eq!(store.get("todo-20200101").unwrap(), Some(b"[1]".to_vec()));
    }

    #[test]
    fn keys_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKvStore::new(temp_dir.path());

        store.set("home", b"a").unwrap();
        store.set("work", b"b").unwrap();
        assert_eq!(store.get("home").unwrap(), Some(b"a".to_vec()));
        assert_eq!(store.get("work").unwrap(), Some(b"b".to_vec()));
    }

    #[test]
    fn rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKvStore::new(temp_dir.path());

        for key in ["", "  ", "../escape", "a/b", "a\\b", "."] {
            assert!(
                matches!(store.set(key, b"x"), Err(Error::InvalidConfig(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn key_lock_excludes_other_holders_but_not_io() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKvStore::new(temp_dir.path()).with_lock_timeout(50);

        let guard = store.lock_key("todo-20200101").unwrap();
        assert!(matches!(
            store.lock_key("todo-20200101"),
            Err(Error::LockFailed(_))
        ));
        assert!(store.lock_key("work").is_ok());

        store.set("todo-20200101", b"[]").unwrap();
        assert_eq!(store.get("todo-20200101").unwrap(), Some(b"[]".to_vec()));

        drop(guard);
        assert!(store.lock_key("todo-20200101").is_ok());
    }

    #[test]
    fn memory_store_overwrites() {
        let store = MemoryKvStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.insert("k", b"old".to_vec());
        store.set("k", b"new").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"new".to_vec()));
    }
}

//! Persisted key-value medium and the task collection codec that sits on top of it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::model::Task;

/// Name of the single entry holding the serialized task collection.
pub const STORAGE_KEY: &str = "tasklet-todos";

/// A local string key-value store, the persisted medium of the task list.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores every entry as `<dir>/<key>.json`, replaced atomically on write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "opened file store");
        Ok(Self { dir })
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    #[tracing::instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let bytes = match fs::read(self.entry_path(key)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::ReadFailed {
                    key: key.to_string(),
                    source,
                })
            }
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|source| StorageError::NotUtf8 {
                key: key.to_string(),
                source,
            })
    }

    #[tracing::instrument(skip(self, value), fields(bytes = value.len()))]
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key);
        let write = || -> io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&self.dir)?;
            tmp.write_all(value.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|err| err.error)?;
            Ok(())
        };
        write().map_err(|source| StorageError::WriteFailed {
            key: key.to_string(),
            source,
        })
    }
}

#[derive(Debug, Default)]
struct MemoryEntries {
    values: HashMap<String, String>,
    fail_writes: bool,
}

/// In-process store. Clones share the same entries, so a caller can keep a handle to
/// inspect or corrupt what a [`TaskStorage`] wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryEntries>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: impl Into<String>) {
        self.inner
            .borrow_mut()
            .values
            .insert(key.to_string(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().values.get(key).cloned()
    }

    /// Make every following write fail, as a full quota would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.inner.borrow_mut();
        if entries.fail_writes {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::Other, "storage quota exceeded"),
            });
        }
        entries.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the whole task collection under a single entry.
pub struct TaskStorage {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl TaskStorage {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    pub fn with_key(backend: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.into(),
        }
    }

    /// Absent entry yields an empty collection.
    pub fn load(&self) -> Result<Vec<Task>, StorageError> {
        let Some(raw) = self.backend.get(&self.key)? else {
            debug!(key = %self.key, "no saved tasks");
            return Ok(Vec::new());
        };
        let tasks: Vec<Task> = serde_json::from_str(&raw).map_err(|err| {
            warn!(key = %self.key, error = %err, "saved tasks are corrupt");
            StorageError::Corrupt(err)
        })?;
        debug!(key = %self.key, count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    pub fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let payload = serde_json::to_string(tasks).map_err(StorageError::Serialize)?;
        self.backend.set(&self.key, &payload).inspect_err(|err| {
            warn!(key = %self.key, error = %err, "failed to persist tasks");
        })?;
        debug!(key = %self.key, count = tasks.len(), "persisted tasks");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn sample_tasks() -> Vec<Task> {
        let mut done = Task::new(
            "01HX0000000000000000000002".into(),
            "Ship <release> & \"notes\"".into(),
            Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap(),
        );
        done.completed = true;
        let open = Task::new(
            "01HX0000000000000000000001".into(),
            "Buy milk".into(),
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
        );
        vec![done, open]
    }

    #[test]
    fn absent_entry_loads_empty() {
        let storage = TaskStorage::new(MemoryStore::new());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips_in_order() {
        let memory = MemoryStore::new();
        let mut storage = TaskStorage::new(memory.clone());
        let tasks = sample_tasks();

        storage.save(&tasks).unwrap();

        let reopened = TaskStorage::new(memory);
        assert_eq!(reopened.load().unwrap(), tasks);
    }

    #[test]
    fn reads_payloads_with_millisecond_timestamps() {
        let memory = MemoryStore::new();
        memory.insert(
            STORAGE_KEY,
            r#"[{"id":"lx1","text":"Walk dog","completed":false,"createdAt":"2024-05-01T10:00:00.000Z"}]"#,
        );
        let tasks = TaskStorage::new(memory).load().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Walk dog");
        assert_eq!(
            tasks[0].created_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn malformed_payload_is_corrupt() {
        let memory = MemoryStore::new();
        memory.insert(STORAGE_KEY, "{not json");
        let err = TaskStorage::new(memory).load().unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn failed_write_surfaces_write_error() {
        let memory = MemoryStore::new();
        memory.set_fail_writes(true);
        let mut storage = TaskStorage::new(memory.clone());
        let err = storage.save(&sample_tasks()).unwrap_err();
        assert!(matches!(err, StorageError::WriteFailed { .. }));
        assert!(memory.raw(STORAGE_KEY).is_none());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut storage = TaskStorage::new(FileStore::open(dir.path()).unwrap());
        let tasks = sample_tasks();
        storage.save(&tasks).unwrap();

        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.entry_path(STORAGE_KEY).exists());
        assert_eq!(TaskStorage::new(store).load().unwrap(), tasks);
    }

    #[test]
    fn file_store_invalid_utf8_is_corrupt() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(store.entry_path(STORAGE_KEY), [b'[', 0xff, 0xfe, b']']).unwrap();

        let err = TaskStorage::new(store).load().unwrap_err();
        assert!(matches!(err, StorageError::NotUtf8 { .. }));
        assert!(err.is_corrupt());
    }

    #[test]
    fn file_store_missing_entry_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("nothing-here").unwrap(), None);
    }
}

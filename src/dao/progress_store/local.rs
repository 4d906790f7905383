//! Client-local progress storage, keyed `"<namespace>:<round key>"`.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::{
    dao::{
        progress_store::{ProgressStore, StoreKind},
        storage::{StorageError, StorageResult},
    },
    state::{
        ladder::Rung,
        round::{PersistedProgress, RoundKey},
    },
};

/// Minimal string key/value storage scoped to one browser profile or device.
pub trait KeyValueStorage: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Progress store writing a JSON array of rung identifiers, oldest first.
#[derive(Clone)]
pub struct LocalProgressStore {
    storage: Arc<dyn KeyValueStorage>,
    namespace: Arc<str>,
}

impl LocalProgressStore {
    /// Build a store over `storage`, prefixing every key with `namespace`.
    pub fn new(storage: Arc<dyn KeyValueStorage>, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: Arc::from(namespace.into()),
        }
    }

    /// Storage key used for `round_key`.
    pub fn storage_key(&self, round_key: &RoundKey) -> String {
        format!("{}:{}", self.namespace, round_key)
    }
}

impl ProgressStore for LocalProgressStore {
    fn load(&self, key: RoundKey) -> BoxFuture<'static, StorageResult<Option<PersistedProgress>>> {
        let store = self.clone();
        Box::pin(async move {
            let storage_key = store.storage_key(&key);
            let Some(raw) = store.storage.get(&storage_key)? else {
                return Ok(None);
            };
            let revealed_rungs = serde_json::from_str::<Vec<Rung>>(&raw)
                .map_err(|source| StorageError::corrupt(storage_key, source))?;
            Ok(Some(PersistedProgress {
                round_key: key,
                revealed_rungs,
            }))
        })
    }

    fn save(&self, progress: PersistedProgress) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let storage_key = store.storage_key(&progress.round_key);
            let value = serde_json::to_string(&progress.revealed_rungs)
                .map_err(|source| StorageError::corrupt(storage_key.clone(), source))?;
            store.storage.set(&storage_key, &value)
        })
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Local
    }
}

/// In-memory storage, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage persisted as a single JSON object file on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Use `path` as the backing file; it is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|source| StorageError::corrupt(self.path.display().to_string(), source)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(StorageError::unavailable(
                format!("cannot read {}", self.path.display()),
                err,
            )),
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        let contents = serde_json::to_string_pretty(&entries)
            .map_err(|source| StorageError::corrupt(key, source))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|err| {
                StorageError::unavailable(format!("cannot write {}", self.path.display()), err)
            })
    }
}

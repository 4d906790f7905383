//! Server-backed progress storage for signed-in players.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::{
    dao::{
        progress_store::{ProgressStore, StoreKind},
        storage::StorageResult,
    },
    state::{
        ladder::Rung,
        round::{PersistedProgress, RoundKey},
    },
};

/// Backend endpoints storing revealed rungs per round for the authenticated subject.
pub trait ProgressBackend: Send + Sync {
    /// Revealed rungs recorded for `key`, `None` when the server has no record.
    fn get(&self, key: RoundKey) -> BoxFuture<'static, StorageResult<Option<Vec<Rung>>>>;
    /// Overwrite the record for `key`.
    fn put(&self, key: RoundKey, revealed: Vec<Rung>) -> BoxFuture<'static, StorageResult<()>>;
}

/// Progress store delegating to a [`ProgressBackend`].
#[derive(Clone)]
pub struct RemoteProgressStore {
    backend: Arc<dyn ProgressBackend>,
}

impl RemoteProgressStore {
    /// Wrap `backend`.
    pub fn new(backend: Arc<dyn ProgressBackend>) -> Self {
        Self { backend }
    }
}

impl ProgressStore for RemoteProgressStore {
    fn load(&self, key: RoundKey) -> BoxFuture<'static, StorageResult<Option<PersistedProgress>>> {
        let backend = self.backend.clone();
        Box::pin(async move {
            let revealed = backend.get(key.clone()).await?;
            Ok(revealed.map(|revealed_rungs| PersistedProgress {
                round_key: key,
                revealed_rungs,
            }))
        })
    }

    fn save(&self, progress: PersistedProgress) -> BoxFuture<'static, StorageResult<()>> {
        self.backend
            .put(progress.round_key, progress.revealed_rungs)
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Remote
    }
}

#[cfg(test)]
mod tests {
    use dashmap::DashMap;

    use super::*;

    #[derive(Default)]
    struct FakeBackend {
        records: Arc<DashMap<RoundKey, Vec<Rung>>>,
    }

    impl ProgressBackend for FakeBackend {
        fn get(&self, key: RoundKey) -> BoxFuture<'static, StorageResult<Option<Vec<Rung>>>> {
            let records = self.records.clone();
            Box::pin(async move { Ok(records.get(&key).map(|entry| entry.clone())) })
        }

        fn put(&self, key: RoundKey, revealed: Vec<Rung>) -> BoxFuture<'static, StorageResult<()>> {
            let records = self.records.clone();
            Box::pin(async move {
                records.insert(key, revealed);
                Ok(())
            })
        }
    }

    #[tokio::test]
    async fn missing_record_is_absent() {
        let store = RemoteProgressStore::new(Arc::new(FakeBackend::default()));
        assert!(store.load("round".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn saved_rungs_are_read_back_for_same_round() {
        let backend = Arc::new(FakeBackend::default());
        let store = RemoteProgressStore::new(backend.clone());

        store
            .save(PersistedProgress {
                round_key: "round".into(),
                revealed_rungs: vec!["a".into(), "b".into()],
            })
            .await
            .unwrap();

        let loaded = store.load("round".into()).await.unwrap().unwrap();
        assert_eq!(loaded.round_key, RoundKey::from("round"));
        assert_eq!(loaded.last_revealed(), Some(&Rung::from("b")));
        assert!(store.load("other".into()).await.unwrap().is_none());
    }
}

pub mod local;
pub mod remote;

use std::sync::{Arc, OnceLock};

use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::{
    dao::storage::StorageResult,
    state::{
        ladder::Rung,
        round::{PersistedProgress, RoundKey},
    },
};

pub use self::local::{FileStorage, KeyValueStorage, LocalProgressStore, MemoryStorage};
pub use self::remote::{ProgressBackend, RemoteProgressStore};

/// Abstraction over where reveal progress is kept.
pub trait ProgressStore: Send + Sync {
    /// Read the progress saved for `key`, `None` when nothing was saved.
    fn load(&self, key: RoundKey) -> BoxFuture<'static, StorageResult<Option<PersistedProgress>>>;
    /// Replace whatever was saved for `progress.round_key`.
    fn save(&self, progress: PersistedProgress) -> BoxFuture<'static, StorageResult<()>>;
    /// Variant of this store, used for logging and store selection checks.
    fn kind(&self) -> StoreKind;
}

/// Which persistence variant a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Client-local storage, not shared across devices.
    Local,
    /// Server-side storage keyed by the authenticated subject.
    Remote,
}

/// Authentication status observed when a session is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// Nobody is signed in.
    Anonymous,
    /// A signed-in player; the backend derives identity from the session.
    Authenticated {
        /// Subject identifier, used for logging only.
        subject: String,
    },
}

impl AuthStatus {
    /// True for signed-in players.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated { .. })
    }
}

enum WriteCommand {
    Save(PersistedProgress),
    Flush(oneshot::Sender<()>),
}

/// Best-effort persistence used by the session controller.
///
/// Loads degrade to "nothing saved" on any failure. Saves are queued to a
/// single background writer, so they reach the store in the order they were
/// issued and storage trouble never blocks or fails a round.
#[derive(Clone)]
pub struct ProgressAdapter {
    store: Arc<dyn ProgressStore>,
    writer: Arc<OnceLock<mpsc::UnboundedSender<WriteCommand>>>,
}

impl ProgressAdapter {
    /// Wrap an explicit store implementation.
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self {
            store,
            writer: Arc::new(OnceLock::new()),
        }
    }

    /// Pick the remote store for signed-in players and the local one otherwise.
    ///
    /// The choice is made once; a later sign-in does not switch stores.
    pub fn for_auth(
        auth: &AuthStatus,
        local: Arc<dyn KeyValueStorage>,
        namespace: impl Into<String>,
        backend: Arc<dyn ProgressBackend>,
    ) -> Self {
        let store: Arc<dyn ProgressStore> = match auth {
            AuthStatus::Authenticated { subject } => {
                debug!(%subject, "using server-backed progress store");
                Arc::new(RemoteProgressStore::new(backend))
            }
            AuthStatus::Anonymous => {
                debug!("using local progress store");
                Arc::new(LocalProgressStore::new(local, namespace))
            }
        };
        Self::new(store)
    }

    /// Variant backing this adapter.
    pub fn kind(&self) -> StoreKind {
        self.store.kind()
    }

    /// Read saved progress, treating every failure as "first visit".
    pub async fn load(&self, key: &RoundKey) -> Option<PersistedProgress> {
        match self.store.load(key.clone()).await {
            Ok(progress) => progress.filter(|p| !p.revealed_rungs.is_empty()),
            Err(err) => {
                warn!(round_key = %key, store = ?self.kind(), error = %err, "failed to load progress; starting fresh");
                None
            }
        }
    }

    /// Overwrite saved progress in the background. Failures are logged only.
    ///
    /// Must be called from within a Tokio runtime; the writer task is started
    /// on first use.
    pub fn save(&self, key: &RoundKey, revealed: &[Rung]) {
        let progress = PersistedProgress {
            round_key: key.clone(),
            revealed_rungs: revealed.to_vec(),
        };
        if self.writer().send(WriteCommand::Save(progress)).is_err() {
            warn!(round_key = %key, "progress writer stopped; save dropped");
        }
    }

    /// Wait for every save issued so far to settle.
    pub async fn flush(&self) {
        let Some(writer) = self.writer.get() else {
            return;
        };
        let (done_tx, done_rx) = oneshot::channel();
        if writer.send(WriteCommand::Flush(done_tx)).is_err() {
            return;
        }
        if done_rx.await.is_err() {
            warn!("progress writer stopped before flushing");
        }
    }

    fn writer(&self) -> &mpsc::UnboundedSender<WriteCommand> {
        self.writer
            .get_or_init(|| spawn_writer(self.store.clone()))
    }
}

/// Apply queued commands one at a time until every adapter handle is dropped.
fn spawn_writer(store: Arc<dyn ProgressStore>) -> mpsc::UnboundedSender<WriteCommand> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            match command {
                WriteCommand::Save(progress) => {
                    let round_key = progress.round_key.clone();
                    if let Err(err) = store.save(progress).await {
                        warn!(%round_key, store = ?store.kind(), error = %err, "failed to save progress");
                    }
                }
                WriteCommand::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
    });
    tx
}

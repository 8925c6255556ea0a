//! Persistence adapter: load the task list once, save it after every change.
//!
//! The whole list is stored as one JSON array under a fixed key. There are no
//! partial updates and no schema versioning; every save overwrites the
//! previous value.
//!
//! Saves go through a [`SaveScheduler`]: a background worker fed by a channel.
//! Each scheduled snapshot is the complete settled list, and the worker only
//! writes the newest snapshot waiting in the queue, so the last write wins.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::item::TaskItem;
use crate::kv::KvStore;

/// Key the task list is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "todo-20200101";

/// Result of a startup load that never fails the caller.
#[derive(Debug)]
pub struct LoadOutcome {
    /// Loaded items, or an empty list when nothing was stored or loading failed.
    pub items: Vec<TaskItem>,
    /// A previous value existed under the key.
    pub found: bool,
    /// The failure that forced an empty list, already logged.
    pub failure: Option<Error>,
}

/// Typed load/save over a [`KvStore`].
pub struct Persistence<S: KvStore> {
    kv: Arc<S>,
    key: String,
}

impl<S: KvStore> Clone for Persistence<S> {
    fn clone(&self) -> Self {
        Self {
            kv: Arc::clone(&self.kv),
            key: self.key.clone(),
        }
    }
}

impl<S: KvStore> Persistence<S> {
    pub fn new(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv: Arc::new(kv),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Fetch the stored list. `Ok(None)` when no value exists yet.
    pub async fn load(&self) -> Result<Option<Vec<TaskItem>>> {
        let kv = Arc::clone(&self.kv);
        let key = self.key.clone();
        let raw = tokio::task::spawn_blocking(move || kv.get(&key))
            .await
            .map_err(|err| self.load_failure(err))?
            .map_err(|err| self.load_failure(err))?;

        let Some(raw) = raw else {
            debug!(key = %self.key, "no stored task list");
            return Ok(None);
        };

        let items = decode(&raw).map_err(|err| self.load_failure(err))?;
        debug!(key = %self.key, count = items.len(), "loaded task list");
        Ok(Some(items))
    }

    /// Load for startup: failures are logged and yield an empty list.
    pub async fn load_or_empty(&self) -> LoadOutcome {
        match self.load().await {
            Ok(Some(items)) => LoadOutcome {
                items,
                found: true,
                failure: None,
            },
            Ok(None) => LoadOutcome {
                items: Vec::new(),
                found: false,
                failure: None,
            },
            Err(err) => {
                warn!(error = %err, "starting with an empty task list");
                LoadOutcome {
                    items: Vec::new(),
                    found: false,
                    failure: Some(err),
                }
            }
        }
    }

    /// Overwrite the stored list with `items`.
    pub async fn save(&self, items: Vec<TaskItem>) -> Result<()> {
        let payload = encode(&items).map_err(|err| self.save_failure(err))?;
        let kv = Arc::clone(&self.kv);
        let key = self.key.clone();
        tokio::task::spawn_blocking(move || kv.set(&key, &payload))
            .await
            .map_err(|err| self.save_failure(err))?
            .map_err(|err| self.save_failure(err))?;
        debug!(key = %self.key, count = items.len(), "saved task list");
        Ok(())
    }

    /// Start the background save worker. Must be called inside a tokio runtime.
    pub fn spawn_saver(&self) -> SaveScheduler {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_saver(self.clone(), rx));
        SaveScheduler { tx, worker }
    }

    fn load_failure(&self, err: impl std::fmt::Display) -> Error {
        Error::LoadFailure {
            key: self.key.clone(),
            reason: err.to_string(),
        }
    }

    fn save_failure(&self, err: impl std::fmt::Display) -> Error {
        Error::SaveFailure {
            key: self.key.clone(),
            reason: err.to_string(),
        }
    }
}

fn decode(raw: &[u8]) -> Result<Vec<TaskItem>> {
    // An explicit JSON null is what a store holds after clearing a value.
    let items: Option<Vec<TaskItem>> = serde_json::from_slice(raw)?;
    Ok(items.unwrap_or_default())
}

fn encode(items: &[TaskItem]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(items)?)
}

/// What the save worker did before shutting down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    /// Snapshots written successfully.
    pub saved: usize,
    /// Snapshots superseded by a newer one before they were written.
    pub coalesced: usize,
    /// Failed writes, already logged.
    pub failures: Vec<String>,
}

impl SaveReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Handle to the background save worker.
pub struct SaveScheduler {
    tx: mpsc::UnboundedSender<Vec<TaskItem>>,
    worker: JoinHandle<SaveReport>,
}

impl SaveScheduler {
    /// Queue a snapshot of the settled list. Never blocks, never fails the caller.
    pub fn schedule(&self, items: Vec<TaskItem>) {
        if self.tx.send(items).is_err() {
            warn!("save worker has stopped; snapshot dropped");
        }
    }

    /// Stop accepting snapshots and wait for pending writes.
    pub async fn flush(self) -> SaveReport {
        let SaveScheduler { tx, worker } = self;
        drop(tx);
        match worker.await {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "save worker panicked");
                SaveReport {
                    failures: vec![err.to_string()],
                    ..SaveReport::default()
                }
            }
        }
    }
}

async fn run_saver<S: KvStore>(
    persistence: Persistence<S>,
    mut rx: mpsc::UnboundedReceiver<Vec<TaskItem>>,
) -> SaveReport {
    let mut report = SaveReport::default();

    while let Some(mut snapshot) = rx.recv().await {
        while let Ok(newer) = rx.try_recv() {
            snapshot = newer;
            report.coalesced += 1;
        }

        match persistence.save(snapshot).await {
            Ok(()) => report.saved += 1,
            Err(err) => {
                warn!(error = %err, "save failed; in-memory list is unchanged");
                report.failures.push(err.to_string());
            }
        }
    }

    report
}

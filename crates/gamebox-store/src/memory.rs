//! In-process document store backed by `tokio::sync::watch` channels.
//!
//! Every document keeps a watch channel alongside its current snapshot.
//! Writes publish the new snapshot through the channel; each subscriber
//! holds a receiver and sees the latest state whenever it asks. Watch
//! semantics skip intermediate values under load, which is exactly the
//! contract: snapshots are full state, so only the latest one matters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::watch;

use crate::{DocumentStore, Snapshot, StoreError, Subscription, Version};

struct DocEntry {
    snapshot: Snapshot,
    /// `None` is the tombstone broadcast on delete.
    tx: watch::Sender<Option<Snapshot>>,
}

struct Inner {
    docs: Mutex<HashMap<String, DocEntry>>,
    /// Simulates loss of connectivity; every operation fails while set.
    offline: AtomicBool,
}

/// An in-process [`DocumentStore`].
///
/// Cheap to clone — all clones share the same documents. Used for
/// development, demos, and every test in this workspace.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                docs: Mutex::new(HashMap::new()),
                offline: AtomicBool::new(false),
            }),
        }
    }

    /// Toggles simulated connectivity loss.
    ///
    /// While offline, every operation returns [`StoreError::Unavailable`].
    /// Existing subscriptions stay open (a dropped network link does not
    /// forget server-side listeners).
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Returns the number of documents currently stored.
    pub fn len(&self) -> usize {
        self.inner.docs.lock().expect("store lock poisoned").len()
    }

    /// Returns `true` if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".into()));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    type Subscription = MemorySubscription;

    async fn create(&self, id: &str, value: Value) -> Result<Version, StoreError> {
        self.check_online()?;
        let mut docs = self.inner.docs.lock().expect("store lock poisoned");
        if docs.contains_key(id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }

        let snapshot = Snapshot {
            version: Version::INITIAL,
            value,
        };
        let (tx, _rx) = watch::channel(Some(snapshot.clone()));
        docs.insert(id.to_string(), DocEntry { snapshot, tx });

        tracing::debug!(doc = id, "document created");
        Ok(Version::INITIAL)
    }

    async fn get(&self, id: &str) -> Result<Snapshot, StoreError> {
        self.check_online()?;
        let docs = self.inner.docs.lock().expect("store lock poisoned");
        docs.get(id)
            .map(|entry| entry.snapshot.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn conditional_update(
        &self,
        id: &str,
        expected: Version,
        value: Value,
    ) -> Result<Version, StoreError> {
        self.check_online()?;
        let mut docs = self.inner.docs.lock().expect("store lock poisoned");
        let entry = docs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let actual = entry.snapshot.version;
        if actual != expected {
            tracing::debug!(doc = id, %expected, %actual, "conditional update conflict");
            return Err(StoreError::Conflict {
                id: id.to_string(),
                expected,
                actual,
            });
        }

        let version = actual.next();
        entry.snapshot = Snapshot { version, value };
        // send_replace stores the value even with no receivers around,
        // so a later subscriber still starts from the current state.
        entry.tx.send_replace(Some(entry.snapshot.clone()));

        tracing::debug!(doc = id, %version, "document updated");
        Ok(version)
    }

    async fn subscribe(&self, id: &str) -> Result<MemorySubscription, StoreError> {
        self.check_online()?;
        let docs = self.inner.docs.lock().expect("store lock poisoned");
        let entry = docs
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut rx = entry.tx.subscribe();
        // A fresh receiver has already "seen" the current value; mark it
        // so the first `next()` yields the current snapshot immediately.
        rx.mark_changed();

        tracing::debug!(doc = id, "subscription opened");
        Ok(MemorySubscription { rx })
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.check_online()?;
        let mut docs = self.inner.docs.lock().expect("store lock poisoned");
        let entry = docs
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        entry.tx.send_replace(None);
        tracing::debug!(doc = id, "document deleted");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.check_online()?;
        let docs = self.inner.docs.lock().expect("store lock poisoned");
        let mut ids: Vec<String> = docs
            .keys()
            .filter(|id| id.starts_with(prefix))
            .cloned()
            .collect();
        ids.sort();
        Ok(ids)
    }
}

/// A [`Subscription`] over a [`MemoryStore`] document.
///
/// Dropping the subscription releases the listener — there is no other
/// teardown to perform.
pub struct MemorySubscription {
    rx: watch::Receiver<Option<Snapshot>>,
}

impl Subscription for MemorySubscription {
    async fn next(&mut self) -> Option<Snapshot> {
        // `changed()` errs when the sender is gone (document deleted and
        // entry dropped, or store torn down) — the feed is over either way.
        if self.rx.changed().await.is_err() {
            return None;
        }
        self.rx.borrow_and_update().clone()
    }
}

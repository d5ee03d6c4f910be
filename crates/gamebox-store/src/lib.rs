//! Document store abstraction for Gamebox.
//!
//! Provides the [`DocumentStore`] and [`Subscription`] traits that abstract
//! over the backing document service (Firestore in production, an in-process
//! store for development and tests).
//!
//! Documents are versioned: every write bumps a per-document counter, and
//! [`DocumentStore::conditional_update`] only succeeds when the caller's
//! expected version matches. That conditional write is the single ordering
//! primitive two game sessions share — there are no locks across processes.
//!
//! # Feature Flags
//!
//! - `memory` (default) — [`MemoryStore`], an in-process implementation
//!   backed by `tokio::sync::watch` channels

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "memory")]
mod memory;

pub use error::StoreError;
#[cfg(feature = "memory")]
pub use memory::{MemoryStore, MemorySubscription};

use std::fmt;

use serde_json::Value;

/// Monotonic version counter for one document.
///
/// Starts at 1 on `create` and increments on every accepted write.
/// Comparing versions is only meaningful within a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u64);

impl Version {
    /// The version assigned by `create`.
    pub const INITIAL: Version = Version(1);

    /// Creates a `Version` from a raw `u64`.
    pub fn new(v: u64) -> Self {
        Self(v)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }

    /// Returns the version the next accepted write will carry.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A full copy of a document at one version.
///
/// Snapshots are what subscriptions deliver: always the complete document,
/// never a delta, so out-of-order or skipped deliveries are harmless —
/// the latest snapshot is always authoritative on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The document's version at the time of this snapshot.
    pub version: Version,
    /// The document's fields.
    pub value: Value,
}

/// A versioned key-value document service.
///
/// This is the boundary to the external store. Implementations must
/// guarantee that `conditional_update` is atomic per document: of two
/// racing writers with the same expected version, exactly one succeeds.
pub trait DocumentStore: Send + Sync + 'static {
    /// The subscription type produced by this store.
    type Subscription: Subscription;

    /// Creates a document at [`Version::INITIAL`].
    ///
    /// # Errors
    /// [`StoreError::AlreadyExists`] if the id is taken.
    async fn create(&self, id: &str, value: Value) -> Result<Version, StoreError>;

    /// Reads the current snapshot of a document.
    async fn get(&self, id: &str) -> Result<Snapshot, StoreError>;

    /// Replaces a document's value iff its version still equals `expected`.
    ///
    /// Returns the new version on success.
    ///
    /// # Errors
    /// [`StoreError::Conflict`] if another write got there first.
    async fn conditional_update(
        &self,
        id: &str,
        expected: Version,
        value: Value,
    ) -> Result<Version, StoreError>;

    /// Opens a live subscription to a document.
    ///
    /// The subscription yields the current snapshot first, then a snapshot
    /// for each subsequent change, until the document is deleted.
    async fn subscribe(&self, id: &str) -> Result<Self::Subscription, StoreError>;

    /// Deletes a document. Open subscriptions end.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Lists ids of existing documents under the given prefix.
    ///
    /// Backed by a collection query on stores that have one.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// A live feed of snapshots for one document.
pub trait Subscription: Send + 'static {
    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the document has been deleted or the store
    /// has gone away — the feed never resumes after that.
    async fn next(&mut self) -> Option<Snapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_initial_is_one() {
        assert_eq!(Version::INITIAL.into_inner(), 1);
    }

    #[test]
    fn test_version_next_increments() {
        assert_eq!(Version::new(3).next(), Version::new(4));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(7).to_string(), "v7");
    }

    #[test]
    fn test_version_ordering() {
        assert!(Version::new(1) < Version::new(2));
        assert_eq!(Version::new(5), Version::new(5));
    }
}

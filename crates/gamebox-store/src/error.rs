//! Error types for the store layer.

use crate::Version;

/// Errors that can occur during document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document exists under the given id.
    #[error("document {0} not found")]
    NotFound(String),

    /// A document already exists under the given id.
    /// `create` never overwrites — callers must pick a fresh id.
    #[error("document {0} already exists")]
    AlreadyExists(String),

    /// A conditional update lost the race: the document's current
    /// version no longer matches what the caller observed.
    #[error("version conflict on {id}: expected {expected}, found {actual}")]
    Conflict {
        id: String,
        expected: Version,
        actual: Version,
    },

    /// The backing store cannot be reached. Transient — callers are
    /// expected to retry with backoff.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

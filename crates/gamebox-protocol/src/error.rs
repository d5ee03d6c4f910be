//! Error types for the document model.

/// Errors that can occur while converting room documents to and from
/// the store's field format.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization into store fields failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization from store fields failed.
    ///
    /// Common causes: a document written by an incompatible client
    /// version, missing required fields, wrong field types.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The fields parsed but violate a document invariant.
    /// For example, more than two player slots.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

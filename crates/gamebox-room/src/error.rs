//! Error types for the room layer.

use gamebox_games::GameError;
use gamebox_protocol::{PlayerId, ProtocolError, RoomId};
use gamebox_store::StoreError;

/// Errors that can occur during directory operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room identifier does not resolve to a document.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Both player slots are already occupied (or the game has moved
    /// past `Waiting`).
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The identity already occupies a slot. Only returned by the strict
    /// join; the default join treats rejoin as idempotent.
    #[error("player {0} already joined room {1}")]
    AlreadyJoined(PlayerId, RoomId),

    /// The join retry budget ran out without winning a conditional
    /// write. With two players this does not happen in practice.
    #[error("joining room {0} kept conflicting, try again")]
    Contended(RoomId),

    /// The room document failed to encode or decode.
    #[error(transparent)]
    Document(#[from] ProtocolError),

    /// The initial game state failed to encode.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The backing store failed. Transient errors are retryable.
    #[error("document store error: {0}")]
    Storage(StoreError),
}

/// Maps a store error on a specific room to the room-level taxonomy.
pub(crate) fn store_err(room_id: &RoomId, err: StoreError) -> RoomError {
    match err {
        StoreError::NotFound(_) => RoomError::NotFound(room_id.clone()),
        other => RoomError::Storage(other),
    }
}

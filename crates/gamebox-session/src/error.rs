//! Error types for the session layer.

use gamebox_games::GameError;
use gamebox_protocol::{ProtocolError, RoomId, Slot};
use gamebox_room::TurnError;
use gamebox_store::StoreError;

/// Errors that can occur while attached to a room.
///
/// All of these are recoverable by the caller. The two concurrency
/// errors have a fixed recipe: resync from the latest snapshot, rebuild
/// the move, try again.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The room document does not exist (never created, or swept).
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// The move's sequence number does not extend the locally observed
    /// history. The local view is behind — resync before retrying.
    #[error("stale move: expected seq {expected}, got {got}")]
    StaleMove { expected: u64, got: u64 },

    /// The conditional write lost to a concurrent writer. The move was
    /// NOT accepted; recompute it against the latest snapshot.
    #[error("move seq {seq} lost the write race")]
    ConcurrentMoveConflict { seq: u64 },

    /// The move names a slot this session does not own.
    #[error("session owns {own}, move was for {got}")]
    WrongSlot { own: Slot, got: Slot },

    /// The turn arbiter rejected the move (not your turn, game over,
    /// game not started).
    #[error(transparent)]
    Turn(#[from] TurnError),

    /// The game rules rejected the move. Nothing was written.
    #[error(transparent)]
    Illegal(#[from] GameError),

    /// The room document failed to encode or decode.
    #[error(transparent)]
    Document(#[from] ProtocolError),

    /// The backing store failed. Transient — retry with backoff.
    #[error("document store error: {0}")]
    Storage(StoreError),

    /// The session was detached; no further operations are possible.
    #[error("session is detached")]
    Detached,
}

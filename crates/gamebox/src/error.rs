//! Unified error type for the Gamebox core.

use gamebox_games::GameError;
use gamebox_protocol::ProtocolError;
use gamebox_room::RoomError;
use gamebox_session::SessionError;
use gamebox_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `gamebox` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GameboxError {
    /// A store-level error (missing document, conflict, unavailable).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A document-model error (encode, decode, invalid document).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A game-rules error (illegal move, codec failure).
    #[error(transparent)]
    Game(#[from] GameError),

    /// A directory error (not found, full, contended).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A session error (stale move, write conflict, out of turn).
    #[error(transparent)]
    Session(#[from] SessionError),
}

//! # Gamebox
//!
//! Two-player room synchronization core for the Gamebox game portal.
//!
//! Two browser sessions find each other through a room identifier and
//! play a turn-based game (Tic-Tac-Toe or Battleship) by reading and
//! writing one shared document — no server-side game logic. Consistency
//! comes from optimistic concurrency: every move is published through a
//! conditional write keyed on the document version it was computed
//! against, so each sequence number is owned by exactly one accepted
//! move.
//!
//! ## Quick start
//!
//! ```rust
//! use gamebox::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), GameboxError> {
//! let store = MemoryStore::new();
//! let directory = RoomDirectory::new(store.clone());
//!
//! // First player creates and joins; the second joins by the shared id.
//! let room = directory.create_room(GameKind::TicTacToe, 0).await?;
//! let slot0 = directory.join_room(&room, PlayerId::new("alice"), "Alice", 0).await?;
//! let slot1 = directory.join_room(&room, PlayerId::new("bob"), "Bob", 1).await?;
//!
//! // Each player attaches a live session and plays through it.
//! let mut session = RoomSession::attach(store, room, slot0).await?;
//! let mv = session.next_move(MovePayload::PlaceMark { cell: 4 })?;
//! session.publish_move(mv).await?;
//! # let _ = slot1;
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::GameboxError;

pub use gamebox_games::{
    replay, BattleshipState, Cell, GameError, GameState, TicTacToeState, FLEET_SIZES, GRID,
};
pub use gamebox_protocol::{
    GameKind, Move, MovePayload, Outcome, PlayerId, PlayerSlot, ProtocolError, RoomDoc,
    RoomId, RoomStatus, Ship, Slot, MAX_PLAYERS,
};
pub use gamebox_room::{DirectoryConfig, RoomDirectory, RoomError, TurnError, TurnState};
pub use gamebox_session::{RoomSession, SessionError};
#[cfg(feature = "memory")]
pub use gamebox_store::MemoryStore;
pub use gamebox_store::{DocumentStore, Snapshot, StoreError, Subscription, Version};

/// The commonly used names, importable in one line.
pub mod prelude {
    pub use crate::{
        replay, DirectoryConfig, DocumentStore, GameError, GameKind, GameState, GameboxError,
        Move, MovePayload, Outcome, PlayerId, RoomDirectory, RoomDoc, RoomError, RoomId,
        RoomSession, RoomStatus, SessionError, Ship, Slot, StoreError, Subscription,
        TurnError, TurnState,
    };

    #[cfg(feature = "memory")]
    pub use crate::MemoryStore;
}

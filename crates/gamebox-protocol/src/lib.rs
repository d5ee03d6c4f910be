//! Shared document model for Gamebox.
//!
//! This crate defines the "language" both players' sessions speak through
//! the document store:
//!
//! - **Identity** ([`RoomId`], [`PlayerId`], [`Slot`]) — who and where.
//! - **Room document** ([`RoomDoc`], [`RoomStatus`], [`PlayerSlot`]) —
//!   the single shared record of one game session.
//! - **Moves** ([`Move`], [`MovePayload`], [`Ship`]) — the sequenced
//!   actions that are the only way game state changes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong converting
//!   documents to and from store fields.
//!
//! # Architecture
//!
//! The document model sits between the store (generic fields) and the
//! game codecs (typed state). It knows nothing about game rules or turn
//! order beyond what derives structurally from the move list.
//!
//! ```text
//! Store (fields) → Document (RoomDoc) → Codec (game state)
//! ```

mod doc;
mod error;
mod types;

pub use doc::RoomDoc;
pub use error::ProtocolError;
pub use types::{
    GameKind, Move, MovePayload, Outcome, PlayerId, PlayerSlot, RoomId, RoomStatus, Ship,
    Slot, MAX_PLAYERS, ROOM_COLLECTION,
};

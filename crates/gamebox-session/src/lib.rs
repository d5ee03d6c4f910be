//! Live room sessions for Gamebox.
//!
//! A [`RoomSession`] is one player's end of a two-player game: it owns
//! that player's slot, watches the shared room document, and publishes
//! moves through the store's conditional write.
//!
//! # How it fits in the stack
//!
//! ```text
//! Game UI (above)      ← renders snapshots, submits move payloads
//!     ↕
//! Session (this crate) ← validates locally, publishes optimistically
//!     ↕
//! Room / Games (rules) ← turn arbiter, pure apply_move
//!     ↕
//! Store (below)        ← versioned documents, conditional writes
//! ```
//!
//! There is no server between the two sessions. Consistency rests on one
//! property: a conditional write succeeds for exactly one writer per
//! document version, so every sequence number is owned by at most one
//! accepted move.

mod error;
mod session;

pub use error::SessionError;
pub use session::RoomSession;

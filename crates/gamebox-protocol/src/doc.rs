//! The room document: the single shared record both sessions synchronize on.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    GameKind, Move, Outcome, PlayerId, PlayerSlot, ProtocolError, RoomId, RoomStatus, Slot,
    MAX_PLAYERS,
};

/// The full persisted state of one two-player game session.
///
/// Everything two sessions agree on lives in this document; there is no
/// other channel between them. Two quantities are deliberately *not*
/// stored: the turn owner and the last sequence number. Both derive from
/// the accepted-move list ([`turn`](Self::turn), [`last_seq`](Self::last_seq)),
/// so they cannot drift from the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDoc {
    /// The room's identifier (also the tail of its document key).
    pub id: RoomId,
    /// Which game this room hosts.
    pub game: GameKind,
    /// Occupied player positions, in join order. At most [`MAX_PLAYERS`].
    pub slots: Vec<PlayerSlot>,
    /// Lifecycle state. Only moves forward.
    pub status: RoomStatus,
    /// The current game state, encoded by the game's codec.
    pub state: Value,
    /// Every accepted move, in sequence order. Folding these over the
    /// initial state reproduces `state` exactly.
    pub moves: Vec<Move>,
    /// Set once, when the game reaches a terminal state.
    pub winner: Option<Outcome>,
    /// Caller-supplied unix millis at creation. Used by the directory's
    /// idle sweep, nothing else.
    pub created_at: u64,
    /// Unix millis when the directory's sweep first saw the room
    /// finished. Backfilled by the sweep itself, not by gameplay.
    #[serde(default)]
    pub finished_at: Option<u64>,
}

impl RoomDoc {
    /// Builds the initial document for a fresh room: waiting, no slots,
    /// no moves, the game's starting state.
    pub fn new(id: RoomId, game: GameKind, initial_state: Value, created_at: u64) -> Self {
        Self {
            id,
            game,
            slots: Vec::new(),
            status: RoomStatus::Waiting,
            state: initial_state,
            moves: Vec::new(),
            winner: None,
            created_at,
            finished_at: None,
        }
    }

    /// Sequence number of the last accepted move (0 before any move).
    pub fn last_seq(&self) -> u64 {
        self.moves.len() as u64
    }

    /// The slot whose move is accepted next.
    ///
    /// Derived from move-count parity: slot 0 opens, then strict
    /// alternation. Meaningless until both slots are filled.
    pub fn turn(&self) -> Slot {
        Slot((self.moves.len() % MAX_PLAYERS) as u8)
    }

    /// Returns the slot occupied by the given player, if any.
    pub fn slot_of(&self, player: &PlayerId) -> Option<Slot> {
        self.slots
            .iter()
            .position(|s| &s.player == player)
            .map(|i| Slot(i as u8))
    }

    /// Returns `true` once both player positions are taken.
    pub fn is_full(&self) -> bool {
        self.slots.len() >= MAX_PLAYERS
    }

    /// Encodes the document into the store's field format.
    pub fn to_value(&self) -> Result<Value, ProtocolError> {
        serde_json::to_value(self).map_err(ProtocolError::Encode)
    }

    /// Decodes a document from the store's field format, checking
    /// invariants the type system cannot express.
    pub fn from_value(value: &Value) -> Result<Self, ProtocolError> {
        let doc: RoomDoc =
            serde_json::from_value(value.clone()).map_err(ProtocolError::Decode)?;
        if doc.slots.len() > MAX_PLAYERS {
            return Err(ProtocolError::InvalidDocument(format!(
                "room {} has {} player slots",
                doc.id,
                doc.slots.len()
            )));
        }
        Ok(doc)
    }
}

//! Core identity and game-agnostic types of the shared room document.
//!
//! Everything here is part of the persisted field format: these structures
//! are what both players' sessions read from and write to the store, so
//! their serde shapes are load-bearing and covered by tests.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A room can never hold more than two player slots.
pub const MAX_PLAYERS: usize = 2;

/// Store collection that room documents live under.
pub const ROOM_COLLECTION: &str = "rooms";

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque, URL-safe identifier of one room.
///
/// Generated server-less: whichever session creates the room draws a fresh
/// id. 16 lowercase alphanumerics are 82 bits — collisions are a store-level
/// `AlreadyExists`, which the directory treats as a retry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ID_LEN: usize = 16;

impl RoomId {
    /// Draws a fresh random identifier.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let id = (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    /// Wraps an identifier received from the routing layer.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the store document key for this room.
    pub fn doc_key(&self) -> String {
        format!("{ROOM_COLLECTION}/{}", self.0)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of one player (browser session identity).
///
/// Issued by the onboarding flow; the core never inspects its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps an identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the two player positions in a room: 0 or 1.
///
/// Slot 0 is whoever joined first and always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(pub u8);

impl Slot {
    /// The slot of the first player to join.
    pub const FIRST: Slot = Slot(0);
    /// The slot of the second player to join.
    pub const SECOND: Slot = Slot(1);

    /// Returns the opposing slot.
    pub fn other(self) -> Slot {
        Slot(1 - self.0)
    }

    /// Returns the slot as a `usize` index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// GameKind
// ---------------------------------------------------------------------------

/// Which two-player game a room hosts.
///
/// Serialized in kebab-case to match the route parameters the navigation
/// layer passes in (`/two-player-game/tic-tac-toe/:roomId`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    TicTacToe,
    Battleship,
}

impl GameKind {
    /// Parses a route parameter into a game kind.
    pub fn from_param(param: &str) -> Option<GameKind> {
        match param {
            "tic-tac-toe" => Some(GameKind::TicTacToe),
            "battleship" => Some(GameKind::Battleship),
            _ => None,
        }
    }

    /// Returns the kebab-case name used in routes and storage.
    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "tic-tac-toe",
            GameKind::Battleship => "battleship",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// Transitions are strictly forward — a room never reopens:
///
/// ```text
/// Waiting → InProgress → Finished
/// ```
///
/// - **Waiting**: Room exists, fewer than two slots filled, accepting joins.
/// - **InProgress**: Both slots filled, moves are being exchanged.
/// - **Finished**: A terminal state was reached (win or draw). The final
///   board stays readable until the room is swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomStatus {
    Waiting,
    InProgress,
    Finished,
}

impl RoomStatus {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Attempts to transition to the next state.
    ///
    /// Returns `Some(next)` if a forward transition exists, `None` from
    /// the terminal state.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::InProgress),
            Self::InProgress => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

// ---------------------------------------------------------------------------
// Players and results
// ---------------------------------------------------------------------------

/// One occupied player position in a room.
///
/// Owned by exactly one browser session for its lifetime; assigned at join
/// and never reassigned while the room is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    /// The occupying session's identity.
    pub player: PlayerId,
    /// Name shown to the other player. Display only.
    pub display_name: String,
    /// Caller-supplied unix millis at join time. Informational — the core
    /// never orders anything by wall clock.
    pub joined_at: u64,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Outcome {
    /// The given slot won.
    Winner { slot: Slot },
    /// Neither slot won (full Tic-Tac-Toe board).
    Draw,
}

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

/// One ship in a Battleship fleet, axis-aligned from its bow cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    /// Column of the bow cell.
    pub x: u8,
    /// Row of the bow cell.
    pub y: u8,
    /// Length in cells.
    pub len: u8,
    /// Extends down the grid when `true`, to the right otherwise.
    pub vertical: bool,
}

impl Ship {
    /// Returns every cell this ship occupies.
    pub fn cells(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (0..self.len).map(move |i| {
            if self.vertical {
                (self.x, self.y + i)
            } else {
                (self.x + i, self.y)
            }
        })
    }
}

/// The game-specific content of one move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MovePayload {
    /// Tic-Tac-Toe: claim a cell (0–8, row-major).
    PlaceMark { cell: u8 },
    /// Battleship: commit a fleet layout. Each slot's first move.
    PlaceFleet { ships: Vec<Ship> },
    /// Battleship: fire at a grid cell.
    Fire { x: u8, y: u8 },
}

/// One player-submitted, sequenced action against the game state.
///
/// Immutable once accepted into the room's move list. `seq` is 1-based
/// and strictly increasing; the document's accepted-move count is the
/// only source of the next sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Which slot submitted the move.
    pub slot: Slot,
    /// Position in the accepted-move sequence, starting at 1.
    pub seq: u64,
    /// The game-specific action.
    pub payload: MovePayload,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Field-shape tests. Both sessions parse documents the other wrote,
    //! so a serde attribute change here is a wire break.

    use super::*;

    #[test]
    fn test_room_id_generate_shape() {
        let id = RoomId::generate();
        assert_eq!(id.as_str().len(), 16);
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_room_id_generate_is_fresh() {
        assert_ne!(RoomId::generate(), RoomId::generate());
    }

    #[test]
    fn test_room_id_doc_key() {
        let id = RoomId::new("abc123");
        assert_eq!(id.doc_key(), "rooms/abc123");
    }

    #[test]
    fn test_room_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomId::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn test_slot_other_flips() {
        assert_eq!(Slot::FIRST.other(), Slot::SECOND);
        assert_eq!(Slot::SECOND.other(), Slot::FIRST);
    }

    #[test]
    fn test_slot_serializes_as_plain_number() {
        let json = serde_json::to_string(&Slot(1)).unwrap();
        assert_eq!(json, "1");
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(Slot::FIRST.to_string(), "slot-0");
    }

    #[test]
    fn test_game_kind_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&GameKind::TicTacToe).unwrap(),
            "\"tic-tac-toe\""
        );
        assert_eq!(
            serde_json::to_string(&GameKind::Battleship).unwrap(),
            "\"battleship\""
        );
    }

    #[test]
    fn test_game_kind_from_param() {
        assert_eq!(GameKind::from_param("tic-tac-toe"), Some(GameKind::TicTacToe));
        assert_eq!(GameKind::from_param("battleship"), Some(GameKind::Battleship));
        assert_eq!(GameKind::from_param("chess"), None);
    }

    #[test]
    fn test_room_status_next_follows_strict_order() {
        assert_eq!(RoomStatus::Waiting.next(), Some(RoomStatus::InProgress));
        assert_eq!(RoomStatus::InProgress.next(), Some(RoomStatus::Finished));
        assert_eq!(RoomStatus::Finished.next(), None);
    }

    #[test]
    fn test_room_status_never_goes_backward() {
        assert!(!RoomStatus::InProgress.can_transition_to(RoomStatus::Waiting));
        assert!(!RoomStatus::Finished.can_transition_to(RoomStatus::Waiting));
        assert!(!RoomStatus::Finished.can_transition_to(RoomStatus::InProgress));
    }

    #[test]
    fn test_room_status_is_joinable() {
        assert!(RoomStatus::Waiting.is_joinable());
        assert!(!RoomStatus::InProgress.is_joinable());
        assert!(!RoomStatus::Finished.is_joinable());
    }

    #[test]
    fn test_outcome_winner_json_format() {
        let json: serde_json::Value =
            serde_json::to_value(Outcome::Winner { slot: Slot(1) }).unwrap();
        assert_eq!(json["type"], "Winner");
        assert_eq!(json["slot"], 1);
    }

    #[test]
    fn test_outcome_draw_json_format() {
        let json: serde_json::Value = serde_json::to_value(Outcome::Draw).unwrap();
        assert_eq!(json["type"], "Draw");
    }

    #[test]
    fn test_move_payload_place_mark_json_format() {
        let json: serde_json::Value =
            serde_json::to_value(MovePayload::PlaceMark { cell: 4 }).unwrap();
        assert_eq!(json["type"], "PlaceMark");
        assert_eq!(json["cell"], 4);
    }

    #[test]
    fn test_move_payload_fire_json_format() {
        let json: serde_json::Value =
            serde_json::to_value(MovePayload::Fire { x: 3, y: 9 }).unwrap();
        assert_eq!(json["type"], "Fire");
        assert_eq!(json["x"], 3);
        assert_eq!(json["y"], 9);
    }

    #[test]
    fn test_move_round_trip() {
        let mv = Move {
            slot: Slot::FIRST,
            seq: 1,
            payload: MovePayload::PlaceFleet {
                ships: vec![Ship { x: 0, y: 0, len: 5, vertical: false }],
            },
        };
        let bytes = serde_json::to_vec(&mv).unwrap();
        let decoded: Move = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(mv, decoded);
    }

    #[test]
    fn test_ship_cells_horizontal() {
        let ship = Ship { x: 2, y: 5, len: 3, vertical: false };
        let cells: Vec<_> = ship.cells().collect();
        assert_eq!(cells, vec![(2, 5), (3, 5), (4, 5)]);
    }

    #[test]
    fn test_ship_cells_vertical() {
        let ship = Ship { x: 7, y: 1, len: 2, vertical: true };
        let cells: Vec<_> = ship.cells().collect();
        assert_eq!(cells, vec![(7, 1), (7, 2)]);
    }

    #[test]
    fn test_decode_unknown_payload_type_returns_error() {
        let unknown = r#"{"type": "Castle", "side": "king"}"#;
        let result: Result<MovePayload, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }
}

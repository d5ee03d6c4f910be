//! Game state codecs for Gamebox.
//!
//! One [`GameState`] variant per game kind, with a uniform capability set:
//!
//! - [`encode`](GameState::encode) / [`decode`](GameState::decode) —
//!   convert between typed state and the store's field format.
//! - [`apply_move`](GameState::apply_move) — the rules. Pure: the same
//!   state and move always produce the same result, and errors never
//!   mutate anything. This single property is what makes live play and
//!   [`replay`]-from-history agree.
//! - [`outcome`](GameState::outcome) — terminal evaluation (win/draw).
//!
//! The room and session layers call these without knowing which game they
//! are running.

mod battleship;
mod tic_tac_toe;

pub use battleship::{BattleshipState, FLEET_SIZES, GRID};
pub use tic_tac_toe::{Cell, TicTacToeState};

use gamebox_protocol::{GameKind, Move, MovePayload, Outcome};
use serde_json::Value;

/// Errors that can occur inside a game's rules or codec.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The move violates the game's rules: occupied cell, off-grid
    /// target, repeated shot, malformed fleet, wrong payload kind.
    /// The state is guaranteed untouched.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// The state blob could not be converted to or from store fields.
    #[error("game state codec failed: {0}")]
    Codec(#[from] serde_json::Error),
}

/// The state of one game, tagged by kind.
///
/// The room document stores the *encoded* form next to the move list;
/// the kind tag lives on the document, so the blob itself is just the
/// game's own fields.
#[derive(Debug, Clone, PartialEq)]
pub enum GameState {
    TicTacToe(TicTacToeState),
    Battleship(BattleshipState),
}

impl GameState {
    /// The starting state for a fresh room of the given kind.
    pub fn initial(game: GameKind) -> GameState {
        match game {
            GameKind::TicTacToe => GameState::TicTacToe(TicTacToeState::default()),
            GameKind::Battleship => GameState::Battleship(BattleshipState::default()),
        }
    }

    /// Returns which game this state belongs to.
    pub fn kind(&self) -> GameKind {
        match self {
            GameState::TicTacToe(_) => GameKind::TicTacToe,
            GameState::Battleship(_) => GameKind::Battleship,
        }
    }

    /// Encodes the state into the store's field format.
    pub fn encode(&self) -> Result<Value, GameError> {
        let value = match self {
            GameState::TicTacToe(s) => serde_json::to_value(s)?,
            GameState::Battleship(s) => serde_json::to_value(s)?,
        };
        Ok(value)
    }

    /// Decodes a state blob of the given kind.
    pub fn decode(game: GameKind, value: &Value) -> Result<GameState, GameError> {
        let state = match game {
            GameKind::TicTacToe => {
                GameState::TicTacToe(serde_json::from_value(value.clone())?)
            }
            GameKind::Battleship => {
                GameState::Battleship(serde_json::from_value(value.clone())?)
            }
        };
        Ok(state)
    }

    /// Applies one move, returning the resulting state.
    ///
    /// Pure — `self` is never mutated, so callers can retry a rejected
    /// move or replay a full history against the same code path.
    pub fn apply_move(&self, mv: &Move) -> Result<GameState, GameError> {
        match (self, &mv.payload) {
            (GameState::TicTacToe(s), MovePayload::PlaceMark { cell }) => {
                tic_tac_toe::apply(s, mv.slot, *cell).map(GameState::TicTacToe)
            }
            (GameState::Battleship(s), payload) => {
                battleship::apply(s, mv.slot, payload).map(GameState::Battleship)
            }
            (state, payload) => Err(GameError::IllegalMove(format!(
                "payload {payload:?} does not belong to {}",
                state.kind()
            ))),
        }
    }

    /// Evaluates the state for a terminal result.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            GameState::TicTacToe(s) => tic_tac_toe::outcome(s),
            GameState::Battleship(s) => battleship::outcome(s),
        }
    }
}

/// Rebuilds a game state by folding `moves` in order over the initial
/// state.
///
/// The replay invariant: for any room, this must reproduce the persisted
/// state blob exactly. Integration tests hold every finished game to it.
pub fn replay(game: GameKind, moves: &[Move]) -> Result<GameState, GameError> {
    let mut state = GameState::initial(game);
    for mv in moves {
        state = state.apply_move(mv)?;
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamebox_protocol::{Ship, Slot};

    fn mark(slot: Slot, seq: u64, cell: u8) -> Move {
        Move { slot, seq, payload: MovePayload::PlaceMark { cell } }
    }

    #[test]
    fn test_initial_state_matches_kind() {
        assert_eq!(GameState::initial(GameKind::TicTacToe).kind(), GameKind::TicTacToe);
        assert_eq!(GameState::initial(GameKind::Battleship).kind(), GameKind::Battleship);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let state = GameState::initial(GameKind::TicTacToe)
            .apply_move(&mark(Slot::FIRST, 1, 4))
            .unwrap();

        let blob = state.encode().unwrap();
        let decoded = GameState::decode(GameKind::TicTacToe, &blob).unwrap();
        assert_eq!(state, decoded);
    }

    #[test]
    fn test_decode_wrong_kind_fails() {
        let blob = GameState::initial(GameKind::Battleship).encode().unwrap();
        assert!(GameState::decode(GameKind::TicTacToe, &blob).is_err());
    }

    #[test]
    fn test_apply_move_rejects_foreign_payload() {
        let state = GameState::initial(GameKind::TicTacToe);
        let mv = Move {
            slot: Slot::FIRST,
            seq: 1,
            payload: MovePayload::Fire { x: 0, y: 0 },
        };
        assert!(matches!(
            state.apply_move(&mv),
            Err(GameError::IllegalMove(_))
        ));
    }

    #[test]
    fn test_replay_reproduces_live_application() {
        // X wins on the top row.
        let moves = [
            mark(Slot::FIRST, 1, 0),
            mark(Slot::SECOND, 2, 3),
            mark(Slot::FIRST, 3, 1),
            mark(Slot::SECOND, 4, 4),
            mark(Slot::FIRST, 5, 2),
        ];

        let mut live = GameState::initial(GameKind::TicTacToe);
        for mv in &moves {
            live = live.apply_move(mv).unwrap();
        }

        let replayed = replay(GameKind::TicTacToe, &moves).unwrap();
        assert_eq!(live, replayed);
        assert_eq!(live.outcome(), Some(Outcome::Winner { slot: Slot::FIRST }));
    }

    #[test]
    fn test_replay_stops_on_illegal_history() {
        let moves = [mark(Slot::FIRST, 1, 4), mark(Slot::SECOND, 2, 4)];
        assert!(matches!(
            replay(GameKind::TicTacToe, &moves),
            Err(GameError::IllegalMove(_))
        ));
    }

    #[test]
    fn test_battleship_replay_through_placement_and_shots() {
        let fleet: Vec<Ship> = FLEET_SIZES
            .iter()
            .enumerate()
            .map(|(i, &len)| Ship { x: 0, y: (i * 2) as u8, len, vertical: false })
            .collect();

        let moves = [
            Move {
                slot: Slot::FIRST,
                seq: 1,
                payload: MovePayload::PlaceFleet { ships: fleet.clone() },
            },
            Move {
                slot: Slot::SECOND,
                seq: 2,
                payload: MovePayload::PlaceFleet { ships: fleet },
            },
            Move { slot: Slot::FIRST, seq: 3, payload: MovePayload::Fire { x: 0, y: 0 } },
            Move { slot: Slot::SECOND, seq: 4, payload: MovePayload::Fire { x: 5, y: 5 } },
        ];

        let state = replay(GameKind::Battleship, &moves).unwrap();
        match &state {
            GameState::Battleship(s) => {
                assert!(s.placement_done());
                assert_eq!(s.shots[0], vec![(0, 0)]);
                assert_eq!(s.shots[1], vec![(5, 5)]);
            }
            other => panic!("expected battleship state, got {other:?}"),
        }
        assert_eq!(state.outcome(), None);
    }
}

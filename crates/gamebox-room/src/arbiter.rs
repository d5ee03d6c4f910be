//! Turn arbitration: whose move is accepted next.
//!
//! The arbiter's state is *derived*, never stored. It is recomputed from
//! the room document every time — slot count, move-count parity, and the
//! recorded winner — so it cannot drift from the persisted source of
//! truth no matter how snapshots interleave.

use gamebox_protocol::{Outcome, RoomDoc, Slot};

/// Errors the arbiter rejects a move attempt with, before anything
/// touches the store.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    /// The room is still waiting for its second player.
    #[error("room is still waiting for players")]
    NotStarted,

    /// It is the other slot's turn.
    #[error("it is not {0}'s turn")]
    NotYourTurn(Slot),

    /// The game has already reached a terminal state.
    #[error("game is already over")]
    GameAlreadyOver,
}

/// The derived turn state of a room.
///
/// ```text
/// WaitingForPlayers → AwaitingMove(0) ⇄ AwaitingMove(1) → GameOver(result)
/// ```
///
/// `WaitingForPlayers` ends when the second slot fills; from then on the
/// awaited slot is the move count modulo two, until a move produces a
/// terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Fewer than two slots are occupied; no move is accepted.
    WaitingForPlayers,
    /// The given slot's move is accepted next.
    AwaitingMove(Slot),
    /// A terminal state was reached; no move is ever accepted again.
    GameOver(Outcome),
}

impl TurnState {
    /// Recomputes the turn state from a room document.
    pub fn derive(doc: &RoomDoc) -> TurnState {
        if let Some(outcome) = doc.winner {
            return TurnState::GameOver(outcome);
        }
        if !doc.is_full() {
            return TurnState::WaitingForPlayers;
        }
        TurnState::AwaitingMove(doc.turn())
    }

    /// Checks whether a move by `slot` is acceptable right now.
    pub fn check_move(doc: &RoomDoc, slot: Slot) -> Result<(), TurnError> {
        match TurnState::derive(doc) {
            TurnState::WaitingForPlayers => Err(TurnError::NotStarted),
            TurnState::GameOver(_) => Err(TurnError::GameAlreadyOver),
            TurnState::AwaitingMove(expected) if expected == slot => Ok(()),
            TurnState::AwaitingMove(_) => Err(TurnError::NotYourTurn(slot)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamebox_protocol::{
        GameKind, Move, MovePayload, PlayerId, PlayerSlot, RoomId, RoomStatus,
    };
    use serde_json::Value;

    fn doc_with(slots: usize, moves: usize, winner: Option<Outcome>) -> RoomDoc {
        let mut doc = RoomDoc::new(
            RoomId::new("r1"),
            GameKind::TicTacToe,
            Value::Null,
            0,
        );
        for i in 0..slots {
            doc.slots.push(PlayerSlot {
                player: PlayerId::new(format!("p{i}")),
                display_name: format!("P{i}"),
                joined_at: 0,
            });
        }
        if slots == 2 {
            doc.status = RoomStatus::InProgress;
        }
        for seq in 1..=moves {
            doc.moves.push(Move {
                slot: Slot(((seq - 1) % 2) as u8),
                seq: seq as u64,
                payload: MovePayload::PlaceMark { cell: seq as u8 },
            });
        }
        doc.winner = winner;
        doc
    }

    #[test]
    fn test_derive_waiting_until_second_slot() {
        assert_eq!(TurnState::derive(&doc_with(0, 0, None)), TurnState::WaitingForPlayers);
        assert_eq!(TurnState::derive(&doc_with(1, 0, None)), TurnState::WaitingForPlayers);
    }

    #[test]
    fn test_derive_awaits_slot_zero_first() {
        assert_eq!(
            TurnState::derive(&doc_with(2, 0, None)),
            TurnState::AwaitingMove(Slot::FIRST)
        );
    }

    #[test]
    fn test_derive_alternates_with_parity() {
        assert_eq!(
            TurnState::derive(&doc_with(2, 1, None)),
            TurnState::AwaitingMove(Slot::SECOND)
        );
        assert_eq!(
            TurnState::derive(&doc_with(2, 2, None)),
            TurnState::AwaitingMove(Slot::FIRST)
        );
    }

    #[test]
    fn test_derive_game_over_once_winner_recorded() {
        let outcome = Outcome::Winner { slot: Slot::FIRST };
        assert_eq!(
            TurnState::derive(&doc_with(2, 5, Some(outcome))),
            TurnState::GameOver(outcome)
        );
    }

    #[test]
    fn test_check_move_rejects_before_start() {
        let result = TurnState::check_move(&doc_with(1, 0, None), Slot::FIRST);
        assert!(matches!(result, Err(TurnError::NotStarted)));
    }

    #[test]
    fn test_check_move_rejects_wrong_slot() {
        let result = TurnState::check_move(&doc_with(2, 0, None), Slot::SECOND);
        assert!(matches!(result, Err(TurnError::NotYourTurn(Slot::SECOND))));
    }

    #[test]
    fn test_check_move_rejects_after_game_over() {
        let doc = doc_with(2, 5, Some(Outcome::Draw));
        let result = TurnState::check_move(&doc, Slot::SECOND);
        assert!(matches!(result, Err(TurnError::GameAlreadyOver)));
    }

    #[test]
    fn test_check_move_accepts_expected_slot() {
        assert!(TurnState::check_move(&doc_with(2, 0, None), Slot::FIRST).is_ok());
        assert!(TurnState::check_move(&doc_with(2, 1, None), Slot::SECOND).is_ok());
    }

    #[test]
    fn test_turn_strictly_alternates_until_game_over() {
        for count in 0..9 {
            let expected = Slot((count % 2) as u8);
            assert_eq!(
                TurnState::derive(&doc_with(2, count, None)),
                TurnState::AwaitingMove(expected),
                "after {count} moves"
            );
        }
    }
}

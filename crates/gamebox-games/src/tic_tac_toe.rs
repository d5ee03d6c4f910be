//! Tic-Tac-Toe rules: a 3×3 board, slot 0 plays X.

use gamebox_protocol::{Outcome, Slot};
use serde::{Deserialize, Serialize};

use crate::GameError;

/// One board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

/// The Tic-Tac-Toe board, row-major: cell 0 is top-left, 8 bottom-right.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicTacToeState {
    pub board: [Cell; 9],
}

/// The eight winning lines, as cell indices.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

fn mark_for(slot: Slot) -> Cell {
    if slot == Slot::FIRST { Cell::X } else { Cell::O }
}

fn has_line(board: &[Cell; 9], mark: Cell) -> bool {
    LINES
        .iter()
        .any(|line| line.iter().all(|&i| board[i] == mark))
}

fn is_full(board: &[Cell; 9]) -> bool {
    board.iter().all(|c| *c != Cell::Empty)
}

/// Applies one mark placement, returning the resulting board.
///
/// Pure: the input state is untouched, errors leave nothing behind.
pub(crate) fn apply(
    state: &TicTacToeState,
    slot: Slot,
    cell: u8,
) -> Result<TicTacToeState, GameError> {
    let idx = cell as usize;
    if idx >= 9 {
        return Err(GameError::IllegalMove(format!(
            "cell {cell} is out of range (0-8)"
        )));
    }
    if state.board[idx] != Cell::Empty {
        return Err(GameError::IllegalMove(format!("cell {cell} is occupied")));
    }

    let mut next = state.clone();
    next.board[idx] = mark_for(slot);
    Ok(next)
}

/// Evaluates the board for a terminal result.
pub(crate) fn outcome(state: &TicTacToeState) -> Option<Outcome> {
    if has_line(&state.board, Cell::X) {
        return Some(Outcome::Winner { slot: Slot::FIRST });
    }
    if has_line(&state.board, Cell::O) {
        return Some(Outcome::Winner { slot: Slot::SECOND });
    }
    if is_full(&state.board) {
        return Some(Outcome::Draw);
    }
    None
}

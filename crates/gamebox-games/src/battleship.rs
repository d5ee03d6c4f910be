//! Battleship rules: fleet placement, then alternating shots.
//!
//! Placement is part of the move sequence — each slot's first move commits
//! its fleet — so turn order stays a pure function of move-count parity
//! and a game replays from its move list alone.

use std::collections::HashSet;

use gamebox_protocol::{MovePayload, Outcome, Ship, Slot};
use serde::{Deserialize, Serialize};

use crate::GameError;

/// Grid side length; coordinates are 0-indexed 0..=9.
pub const GRID: u8 = 10;

/// The classic fleet: carrier, battleship, cruiser, submarine, destroyer.
pub const FLEET_SIZES: [u8; 5] = [5, 4, 3, 3, 2];

/// The Battleship game state.
///
/// Hits and sinkings are derived by intersecting shots with the opposing
/// fleet — they are not stored separately.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleshipState {
    /// Each slot's committed fleet. Empty until that slot has placed.
    pub fleets: [Vec<Ship>; 2],
    /// Cells each slot has fired at, in firing order.
    pub shots: [Vec<(u8, u8)>; 2],
}

impl BattleshipState {
    /// Returns `true` once both fleets are committed.
    pub fn placement_done(&self) -> bool {
        !self.fleets[0].is_empty() && !self.fleets[1].is_empty()
    }

    /// Returns `true` if the shot by `slot` at the given cell hit a ship.
    pub fn is_hit(&self, slot: Slot, x: u8, y: u8) -> bool {
        self.fleets[slot.other().index()]
            .iter()
            .any(|ship| ship.cells().any(|c| c == (x, y)))
    }

    fn fleet_sunk_by(&self, shooter: Slot) -> bool {
        let fleet = &self.fleets[shooter.other().index()];
        if fleet.is_empty() {
            return false;
        }
        let shots: HashSet<(u8, u8)> = self.shots[shooter.index()].iter().copied().collect();
        fleet
            .iter()
            .all(|ship| ship.cells().all(|c| shots.contains(&c)))
    }
}

fn validate_fleet(ships: &[Ship]) -> Result<(), GameError> {
    let mut sizes: Vec<u8> = ships.iter().map(|s| s.len).collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    if sizes != FLEET_SIZES {
        return Err(GameError::IllegalMove(format!(
            "fleet must have ship lengths {FLEET_SIZES:?}, got {sizes:?}"
        )));
    }

    let mut occupied = HashSet::new();
    for ship in ships {
        for (x, y) in ship.cells() {
            if x >= GRID || y >= GRID {
                return Err(GameError::IllegalMove(format!(
                    "ship cell ({x},{y}) is off the grid"
                )));
            }
            if !occupied.insert((x, y)) {
                return Err(GameError::IllegalMove(format!(
                    "ships overlap at ({x},{y})"
                )));
            }
        }
    }
    Ok(())
}

/// Applies one Battleship move, returning the resulting state.
///
/// Pure: the input state is untouched, errors leave nothing behind.
pub(crate) fn apply(
    state: &BattleshipState,
    slot: Slot,
    payload: &MovePayload,
) -> Result<BattleshipState, GameError> {
    match payload {
        MovePayload::PlaceFleet { ships } => {
            if !state.fleets[slot.index()].is_empty() {
                return Err(GameError::IllegalMove(format!(
                    "{slot} has already placed its fleet"
                )));
            }
            validate_fleet(ships)?;

            let mut next = state.clone();
            next.fleets[slot.index()] = ships.clone();
            Ok(next)
        }
        MovePayload::Fire { x, y } => {
            if !state.placement_done() {
                return Err(GameError::IllegalMove(
                    "both fleets must be placed before firing".into(),
                ));
            }
            if *x >= GRID || *y >= GRID {
                return Err(GameError::IllegalMove(format!(
                    "target ({x},{y}) is off the grid"
                )));
            }
            if state.shots[slot.index()].contains(&(*x, *y)) {
                return Err(GameError::IllegalMove(format!(
                    "{slot} already fired at ({x},{y})"
                )));
            }

            let mut next = state.clone();
            next.shots[slot.index()].push((*x, *y));
            Ok(next)
        }
        other => Err(GameError::IllegalMove(format!(
            "payload {other:?} does not belong to battleship"
        ))),
    }
}

/// Evaluates the state for a terminal result. Battleship has no draw.
pub(crate) fn outcome(state: &BattleshipState) -> Option<Outcome> {
    for slot in [Slot::FIRST, Slot::SECOND] {
        if state.fleet_sunk_by(slot) {
            return Some(Outcome::Winner { slot });
        }
    }
    None
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::board::{Board, DIRECTION_COUNT, Player, Square};

/// A destination reachable by the piece under examination. A set
/// `captured` square marks the move as a jump over that square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTarget {
    pub destination: Square,
    pub captured: Option<Square>,
}

impl MoveTarget {
    pub fn step(destination: Square) -> Self {
        MoveTarget {
            destination,
            captured: None,
        }
    }

    pub fn jump(destination: Square, captured: Square) -> Self {
        MoveTarget {
            destination,
            captured: Some(captured),
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.captured {
            Some(captured) => write!(f, "-> {} x{}", self.destination, captured),
            None => write!(f, "-> {}", self.destination),
        }
    }
}

/// Non-capturing steps for the piece at `from`: the forward diagonal
/// neighbors that exist and are empty. Backward steps are never offered.
pub fn regular_steps(board: &Board, from: Square) -> Vec<Square> {
    let owner = match board.occupant(from) {
        Some(player) => player,
        None => return Vec::new(),
    };

    let mut steps = Vec::new();
    for dir in owner.forward_directions() {
        if let Some(next) = from.neighbor(dir) {
            if board.occupant(next).is_none() {
                steps.push(next);
            }
        }
    }
    steps
}

/// Single jumps available to the piece at `from`, in any of the four
/// diagonal directions (capturing may move backward). Chains are not
/// followed here; each qualifying direction contributes one target.
pub fn capture_steps(board: &Board, from: Square) -> Vec<MoveTarget> {
    let owner = match board.occupant(from) {
        Some(player) => player,
        None => return Vec::new(),
    };

    let mut jumps = Vec::new();
    for dir in 0..DIRECTION_COUNT {
        let over = match from.neighbor(dir) {
            Some(square) => square,
            None => continue,
        };
        if board.occupant(over) != Some(owner.opponent()) {
            continue;
        }
        let destination = match from.landing(dir) {
            Some(square) => square,
            None => continue,
        };
        if board.occupant(destination).is_none() {
            jumps.push(MoveTarget::jump(destination, over));
        }
    }
    jumps
}

/// Every destination the piece at `from` may take this turn. Captures are
/// compulsory: whenever any jump exists, or `forced_only` says the player
/// is under obligation, only jumps are returned.
pub fn legal_targets(board: &Board, from: Square, forced_only: bool) -> Vec<MoveTarget> {
    let jumps = capture_steps(board, from);
    if forced_only || !jumps.is_empty() {
        return jumps;
    }
    regular_steps(board, from)
        .into_iter()
        .map(MoveTarget::step)
        .collect()
}

/// The obligation map for `player`: every piece with at least one jump,
/// keyed by its square. An empty map means a regular move is allowed.
pub fn all_forced_captures(board: &Board, player: Player) -> HashMap<Square, Vec<MoveTarget>> {
    let mut forced = HashMap::new();
    for square in board.squares_of(player) {
        let jumps = capture_steps(board, square);
        if !jumps.is_empty() {
            forced.insert(square, jumps);
        }
    }
    forced
}

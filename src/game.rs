use std::collections::HashMap;

use crate::board::{Board, Player, Square};
use crate::error::GameError;
use crate::history::HistoryEntry;
use crate::moves::{MoveTarget, all_forced_captures, capture_steps, legal_targets};

/// What `apply_move` did to the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The jump left the piece with another capture available; the same
    /// player stays on the move with the landing square pre-selected.
    ChainContinues,
    /// The turn is complete and play has passed to the opponent.
    TurnPassed,
}

/// A selected piece together with the destinations it may take.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Selection {
    square: Square,
    targets: Vec<MoveTarget>,
}

/// One playing session: the live board, whose turn it is, and the
/// selection and obligation state driving the next input. All operations
/// are synchronous and run to completion; a rejected input leaves every
/// field untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    board: Board,
    active_player: Player,
    turn: usize,
    forced: HashMap<Square, Vec<MoveTarget>>,
    selection: Option<Selection>,
}

impl Session {
    /// Start a game from the standard position. White moves first.
    pub fn new() -> Self {
        let mut session = Session {
            board: Board::initial(),
            active_player: Player::White,
            turn: 0,
            forced: HashMap::new(),
            selection: None,
        };
        session.begin_turn();
        session
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_player(&self) -> Player {
        self.active_player
    }

    /// Completed-turn counter; it does not advance mid-chain.
    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn selected(&self) -> Option<Square> {
        self.selection.as_ref().map(|selection| selection.square)
    }

    /// Destinations for the current selection, empty when nothing is
    /// selected.
    pub fn legal_targets(&self) -> &[MoveTarget] {
        self.selection
            .as_ref()
            .map(|selection| selection.targets.as_slice())
            .unwrap_or(&[])
    }

    /// The active player's obligation map. Non-empty means only these
    /// squares may be selected, and only their jumps may be played.
    pub fn forced_squares(&self) -> &HashMap<Square, Vec<MoveTarget>> {
        &self.forced
    }

    /// Select the piece on `square` for the active player. Replaces any
    /// previous selection; the board is never touched.
    pub fn select_piece(&mut self, square: Square) -> Result<(), GameError> {
        match self.board.occupant(square) {
            None => {
                return Err(GameError::IllegalSelection(format!(
                    "square {} is empty",
                    square
                )));
            }
            Some(owner) if owner != self.active_player => {
                return Err(GameError::IllegalSelection(format!(
                    "square {} belongs to the opponent",
                    square
                )));
            }
            Some(_) => {}
        }

        if !self.forced.is_empty() && !self.forced.contains_key(&square) {
            return Err(GameError::IllegalSelection(format!(
                "square {} cannot move while a capture is mandatory",
                square
            )));
        }

        let targets = legal_targets(&self.board, square, !self.forced.is_empty());
        self.selection = Some(Selection { square, targets });
        Ok(())
    }

    /// Resolve the pending selection onto `destination`. Returns whether
    /// the turn passed or the same player must continue jumping.
    pub fn apply_move(&mut self, destination: Square) -> Result<MoveOutcome, GameError> {
        let (from, target) = match &self.selection {
            None => {
                return Err(GameError::IllegalMove("no piece is selected".to_string()));
            }
            Some(selection) => {
                match selection
                    .targets
                    .iter()
                    .find(|target| target.destination == destination)
                {
                    None => {
                        return Err(GameError::IllegalMove(format!(
                            "square {} is not a legal destination",
                            destination
                        )));
                    }
                    Some(target) => (selection.square, *target),
                }
            }
        };

        let mover = self.board.occupant(from);
        self.board.set(from, None);
        self.board.set(destination, mover);
        if let Some(captured) = target.captured {
            self.board.set(captured, None);
        }

        if target.is_capture() {
            let chained = capture_steps(&self.board, destination);
            if !chained.is_empty() {
                // the jump must be continued before the turn can pass
                self.forced = HashMap::from([(destination, chained.clone())]);
                self.selection = Some(Selection {
                    square: destination,
                    targets: chained,
                });
                return Ok(MoveOutcome::ChainContinues);
            }
        }

        self.turn += 1;
        self.active_player = self.active_player.opponent();
        self.begin_turn();
        Ok(MoveOutcome::TurnPassed)
    }

    /// Drop the selection. When exactly one piece is under obligation it
    /// is re-selected instead, keeping the obligation in view.
    pub fn cancel_selection(&mut self) {
        self.selection = None;
        self.auto_select();
    }

    /// Snapshot of the state the application stores once per completed
    /// turn.
    pub fn snapshot(&self) -> HistoryEntry {
        HistoryEntry {
            board: self.board.clone(),
            active_player: self.active_player,
            turn: self.turn,
        }
    }

    /// Rebuild the live session from a stored snapshot. Obligations and
    /// the single-obligation auto-selection are recomputed, so restoring
    /// a turn-boundary snapshot reproduces the session exactly.
    pub fn restore(entry: &HistoryEntry) -> Session {
        let mut session = Session {
            board: entry.board.clone(),
            active_player: entry.active_player,
            turn: entry.turn,
            forced: HashMap::new(),
            selection: None,
        };
        session.begin_turn();
        session
    }

    /// Top-of-turn bookkeeping: recompute the obligation map for the
    /// active player and pre-select when it pins a single piece.
    fn begin_turn(&mut self) {
        self.forced = all_forced_captures(&self.board, self.active_player);
        self.selection = None;
        self.auto_select();
    }

    fn auto_select(&mut self) {
        if self.forced.len() != 1 {
            return;
        }
        if let Some((&square, targets)) = self.forced.iter().next() {
            self.selection = Some(Selection {
                square,
                targets: targets.clone(),
            });
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

use serde::{Deserialize, Serialize};

use crate::board::{Board, Player};

/// Immutable snapshot of a completed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub board: Board,
    pub active_player: Player,
    pub turn: usize,
}

/// The application-owned move history: one entry per completed turn plus
/// a cursor for navigation. The engine only produces the entries; it
/// never reads the list.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl History {
    pub fn new() -> Self {
        History {
            entries: Vec::new(),
            index: 0,
        }
    }

    /// Store a completed-turn snapshot. When the entry does not extend
    /// the stored timeline (play resumed from an earlier snapshot), the
    /// abandoned future is discarded first.
    pub fn record(&mut self, entry: HistoryEntry) {
        if let Some(last) = self.entries.last() {
            if last.turn >= entry.turn {
                self.entries.truncate(entry.turn);
            }
        }
        self.index = entry.turn;
        self.entries.push(entry);
    }

    /// Move the cursor to `index`, returning the entry to restore.
    pub fn jump(&mut self, index: usize) -> Option<&HistoryEntry> {
        if index >= self.entries.len() {
            return None;
        }
        self.index = index;
        self.entries.get(index)
    }

    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if self.index == 0 {
            return None;
        }
        let index = self.index - 1;
        self.jump(index)
    }

    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        let index = self.index + 1;
        self.jump(index)
    }

    /// Drop everything but the initial snapshot.
    pub fn reset(&mut self) -> Option<&HistoryEntry> {
        self.entries.truncate(1);
        self.index = 0;
        self.entries.first()
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::game::Session;

    fn entry(turn: usize, active_player: Player) -> HistoryEntry {
        HistoryEntry {
            board: Board::initial(),
            active_player,
            turn,
        }
    }

    #[test]
    fn test_record_appends_in_order() {
        let mut history = History::new();
        history.record(entry(0, Player::White));
        history.record(entry(1, Player::Black));
        history.record(entry(2, Player::White));

        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert_eq!(history.current().unwrap().turn, 2);
    }

    #[test]
    fn test_record_truncates_abandoned_future() {
        let mut history = History::new();
        for turn in 0..5 {
            let player = if turn % 2 == 0 {
                Player::White
            } else {
                Player::Black
            };
            history.record(entry(turn, player));
        }

        // resume from turn 1 and complete a different move
        history.jump(1).unwrap();
        history.record(entry(2, Player::White));

        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert_eq!(history.current().unwrap().turn, 2);
    }

    #[test]
    fn test_jump_bounds() {
        let mut history = History::new();
        history.record(entry(0, Player::White));

        assert!(history.jump(0).is_some());
        assert!(history.jump(1).is_none());
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_back_and_forward() {
        let mut history = History::new();
        history.record(entry(0, Player::White));
        history.record(entry(1, Player::Black));

        assert_eq!(history.back().unwrap().turn, 0);
        assert!(history.back().is_none());
        assert_eq!(history.forward().unwrap().turn, 1);
        assert!(history.forward().is_none());
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn test_reset_keeps_initial_entry() {
        let mut history = History::new();
        history.record(entry(0, Player::White));
        history.record(entry(1, Player::Black));
        history.record(entry(2, Player::White));

        let first = history.reset().unwrap();
        assert_eq!(first.turn, 0);
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_branching_play_through_session() -> Result<(), GameError> {
        let sq = |index: u8| crate::board::Square::new(index).unwrap();

        let mut session = Session::new();
        let mut history = History::new();
        history.record(session.snapshot());

        session.select_piece(sq(17))?;
        session.apply_move(sq(26))?;
        history.record(session.snapshot());

        session.select_piece(sq(46))?;
        session.apply_move(sq(39))?;
        history.record(session.snapshot());
        assert_eq!(history.len(), 3);

        // go back to Black's turn and take the other diagonal instead
        let entry = history.jump(1).unwrap().clone();
        let mut session = Session::restore(&entry);
        session.select_piece(sq(46))?;
        session.apply_move(sq(37))?;
        history.record(session.snapshot());

        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        let replayed = history.current().unwrap();
        assert_eq!(replayed.board.occupant(sq(37)), Some(Player::Black));
        assert_eq!(replayed.board.occupant(sq(39)), None);
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// Board geometry constants
pub const BOARD_SIZE: usize = 8;
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;
pub const PIECES_PER_PLAYER: usize = 12;

/// Diagonal directions in `(row, col)` deltas, ordered so that White's
/// forward pair occupies indices 0..2 and Black's indices 2..4.
pub(crate) const DIRECTIONS: [(i8, i8); 4] = [(1, -1), (1, 1), (-1, -1), (-1, 1)];
pub(crate) const DIRECTION_COUNT: usize = DIRECTIONS.len();

const fn offset(square: usize, dr: i8, dc: i8) -> Option<u8> {
    let row = (square / BOARD_SIZE) as i8 + dr;
    let col = (square % BOARD_SIZE) as i8 + dc;
    if row >= 0 && row < BOARD_SIZE as i8 && col >= 0 && col < BOARD_SIZE as i8 {
        Some((row * BOARD_SIZE as i8 + col) as u8)
    } else {
        None
    }
}

const fn build_step_table(distance: i8) -> [[Option<u8>; DIRECTION_COUNT]; SQUARE_COUNT] {
    let mut table = [[None; DIRECTION_COUNT]; SQUARE_COUNT];
    let mut square = 0;
    while square < SQUARE_COUNT {
        let mut dir = 0;
        while dir < DIRECTION_COUNT {
            let dr = DIRECTIONS[dir].0 * distance;
            let dc = DIRECTIONS[dir].1 * distance;
            table[square][dir] = offset(square, dr, dc);
            dir += 1;
        }
        square += 1;
    }
    table
}

/// Diagonal neighbor per square id and direction.
pub(crate) const NEIGHBORS: [[Option<u8>; DIRECTION_COUNT]; SQUARE_COUNT] = build_step_table(1);
/// Square two diagonal steps away per square id and direction, where a
/// jumping piece lands.
pub(crate) const LANDINGS: [[Option<u8>; DIRECTION_COUNT]; SQUARE_COUNT] = build_step_table(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Starts on rows 0-2 and moves toward increasing row indices.
    White,
    /// Starts on rows 5-7 and moves toward decreasing row indices.
    Black,
}

impl Player {
    pub fn opponent(&self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Indices into `DIRECTIONS` this color may step toward.
    pub(crate) fn forward_directions(&self) -> [usize; 2] {
        match self {
            Player::White => [0, 1],
            Player::Black => [2, 3],
        }
    }

    /// Opaque token used by the presentation layer. White moves first.
    pub fn token(&self) -> &'static str {
        match self {
            Player::White => "player1",
            Player::Black => "player2",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A playable square, identified by its row-major index on the 8x8 grid.
/// Only the 32 squares with `(row + col)` odd can be constructed; the
/// light half of the grid never enters the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Square(u8);

impl Square {
    pub fn new(index: u8) -> Result<Self, GameError> {
        if Self::is_playable(index) {
            Ok(Square(index))
        } else {
            Err(GameError::OutOfRange(index.to_string()))
        }
    }

    pub fn from_coords(row: usize, col: usize) -> Result<Self, GameError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(GameError::OutOfRange(format!("({}, {})", row, col)));
        }
        Self::new((row * BOARD_SIZE + col) as u8)
    }

    pub(crate) const fn is_playable(index: u8) -> bool {
        let row = index as usize / BOARD_SIZE;
        let col = index as usize % BOARD_SIZE;
        (index as usize) < SQUARE_COUNT && (row + col) % 2 == 1
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn row(&self) -> usize {
        self.index() / BOARD_SIZE
    }

    pub fn col(&self) -> usize {
        self.index() % BOARD_SIZE
    }

    /// The adjacent square in the given direction, if it exists.
    /// Diagonal steps preserve square parity, so the result is playable.
    pub(crate) fn neighbor(&self, dir: usize) -> Option<Square> {
        NEIGHBORS[self.index()][dir].map(Square)
    }

    /// The square two steps away in the given direction, if it exists.
    pub(crate) fn landing(&self, dir: usize) -> Option<Square> {
        LANDINGS[self.index()][dir].map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Square {
    type Err = GameError;

    /// Parses the decimal row-major index form used by the presentation
    /// layer ("0".."63").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u8>() {
            Ok(index) => Square::new(index),
            Err(_) => Err(GameError::OutOfRange(s.to_string())),
        }
    }
}

/// Playable-square occupancy for the whole board, indexed by square id.
/// Lookup only; mutation is confined to the turn resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(with = "board_cells_serde")]
    cells: [Option<Player>; SQUARE_COUNT],
}

/// Serde glue for the fixed-size occupancy array. `serde` only derives
/// (de)serialization for arrays up to length 32, so the 64-cell board needs
/// an explicit helper. The wire format is an ordinary JSON array of cells,
/// identical to what a derived impl on a smaller array would produce.
mod board_cells_serde {
    use super::{Player, SQUARE_COUNT};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(
        cells: &[Option<Player>; SQUARE_COUNT],
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        cells.as_slice().serialize(serializer)
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<[Option<Player>; SQUARE_COUNT], D::Error>
    where
        D: Deserializer<'de>,
    {
        let cells = Vec::<Option<Player>>::deserialize(deserializer)?;
        cells.try_into().map_err(|cells: Vec<_>| {
            D::Error::custom(format!(
                "expected {} cells, got {}",
                SQUARE_COUNT,
                cells.len()
            ))
        })
    }
}

impl Board {
    /// Standard starting position: three rows of pieces per side on the
    /// playable squares, two empty rows between them.
    pub fn initial() -> Self {
        let mut cells = [None; SQUARE_COUNT];
        for index in 0..SQUARE_COUNT {
            if !Square::is_playable(index as u8) {
                continue;
            }
            let row = index / BOARD_SIZE;
            if row < 3 {
                cells[index] = Some(Player::White);
            } else if row >= BOARD_SIZE - 3 {
                cells[index] = Some(Player::Black);
            }
        }
        Board { cells }
    }

    pub fn empty() -> Self {
        Board {
            cells: [None; SQUARE_COUNT],
        }
    }

    pub fn occupant(&self, square: Square) -> Option<Player> {
        self.cells[square.index()]
    }

    pub(crate) fn set(&mut self, square: Square, occupant: Option<Player>) {
        self.cells[square.index()] = occupant;
    }

    pub fn piece_count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .filter(|cell| **cell == Some(player))
            .count()
    }

    /// Squares currently holding a piece of `player`, in index order.
    pub fn squares_of(&self, player: Player) -> Vec<Square> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Some(player))
            .map(|(index, _)| Square(index as u8))
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..BOARD_SIZE {
            write!(f, "{:2} ", col)?;
        }
        writeln!(f)?;

        for row in 0..BOARD_SIZE {
            write!(f, "{:2} ", row)?;
            for col in 0..BOARD_SIZE {
                let index = row * BOARD_SIZE + col;
                let c = if !Square::is_playable(index as u8) {
                    ' '
                } else {
                    match self.cells[index] {
                        Some(Player::White) => 'w',
                        Some(Player::Black) => 'b',
                        None => '.',
                    }
                };
                write!(f, " {} ", c)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(index: u8) -> Square {
        Square::new(index).unwrap()
    }

    #[test]
    fn test_playable_parity() {
        // (row + col) odd marks the playable half of the grid
        assert!(Square::new(1).is_ok());
        assert!(Square::new(8).is_ok());
        assert!(Square::new(62).is_ok());
        assert!(Square::new(0).is_err());
        assert!(Square::new(9).is_err());
        assert!(Square::new(63).is_err());
    }

    #[test]
    fn test_square_rejects_out_of_grid() {
        assert_eq!(
            Square::new(64),
            Err(GameError::OutOfRange("64".to_string()))
        );
        assert!(Square::new(255).is_err());
        assert!(Square::from_coords(8, 1).is_err());
        assert!(Square::from_coords(1, 8).is_err());
    }

    #[test]
    fn test_square_string_round_trip() {
        for index in 0..SQUARE_COUNT as u8 {
            if let Ok(square) = Square::new(index) {
                let parsed: Square = square.to_string().parse().unwrap();
                assert_eq!(parsed, square);
            }
        }
        assert!("64".parse::<Square>().is_err());
        assert!("0".parse::<Square>().is_err());
        assert!("not-a-square".parse::<Square>().is_err());
        assert!("-3".parse::<Square>().is_err());
    }

    #[test]
    fn test_coords() {
        let square = sq(19);
        assert_eq!(square.row(), 2);
        assert_eq!(square.col(), 3);
        assert_eq!(Square::from_coords(2, 3).unwrap(), square);
    }

    #[test]
    fn test_neighbor_table() {
        // 19 is (2, 3); its four diagonal neighbors exist
        assert_eq!(sq(19).neighbor(0), Some(sq(26)));
        assert_eq!(sq(19).neighbor(1), Some(sq(28)));
        assert_eq!(sq(19).neighbor(2), Some(sq(10)));
        assert_eq!(sq(19).neighbor(3), Some(sq(12)));

        // 56 is the bottom-left corner (7, 0)
        assert_eq!(sq(56).neighbor(0), None);
        assert_eq!(sq(56).neighbor(1), None);
        assert_eq!(sq(56).neighbor(2), None);
        assert_eq!(sq(56).neighbor(3), Some(sq(49)));
    }

    #[test]
    fn test_landing_table() {
        assert_eq!(sq(19).landing(1), Some(sq(37)));
        assert_eq!(sq(19).landing(2), Some(sq(1)));
        // one row from the edge, a jump would leave the board
        assert_eq!(sq(8).landing(2), None);
        assert_eq!(sq(8).landing(3), None);
    }

    #[test]
    fn test_initial_setup_counts() {
        let board = Board::initial();
        assert_eq!(board.piece_count(Player::White), PIECES_PER_PLAYER);
        assert_eq!(board.piece_count(Player::Black), PIECES_PER_PLAYER);
    }

    #[test]
    fn test_initial_setup_rows() {
        let board = Board::initial();
        for square in board.squares_of(Player::White) {
            assert!(square.row() < 3);
        }
        for square in board.squares_of(Player::Black) {
            assert!(square.row() >= 5);
        }
        // middle rows start empty
        for index in [24u8, 26, 28, 30, 33, 35, 37, 39] {
            assert_eq!(board.occupant(sq(index)), None);
        }
    }

    #[test]
    fn test_initial_setup_symmetric() {
        // the position maps onto itself under a half-turn of the board
        let board = Board::initial();
        for index in 0..SQUARE_COUNT as u8 {
            if let Ok(square) = Square::new(index) {
                let mirrored = sq(63 - index);
                let expected = board.occupant(square).map(|p| p.opponent());
                assert_eq!(board.occupant(mirrored), expected);
            }
        }
    }

    #[test]
    fn test_forward_directions() {
        let (dr, _) = DIRECTIONS[Player::White.forward_directions()[0]];
        assert_eq!(dr, 1);
        let (dr, _) = DIRECTIONS[Player::Black.forward_directions()[0]];
        assert_eq!(dr, -1);
    }

    #[test]
    fn test_player_tokens() {
        assert_eq!(Player::White.token(), "player1");
        assert_eq!(Player::Black.token(), "player2");
        assert_eq!(Player::White.opponent(), Player::Black);
    }
}

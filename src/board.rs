use std::fmt;

use crate::rules::{Move, Turn};
use crate::types::{Position, Side};

const BOARD_SIZE: usize = 8;
const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
const START_ROWS: usize = 3;

/// Contents of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Red,
    Black,
}

impl Cell {
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Red => Some(Side::Red),
            Cell::Black => Some(Side::Black),
        }
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::Red => Cell::Red,
            Side::Black => Cell::Black,
        }
    }
}

/// Checkers board state represented by two bitboards, one bit per square in
/// row-major order.
///
/// The board is `Copy`: search branches each work on their own snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    red: u64,
    black: u64,
}

impl Board {
    /// Creates the initial board: Black on the dark squares of rows 0-2,
    /// Red on the dark squares of rows 5-7.
    pub fn new() -> Self {
        let mut red = 0u64;
        let mut black = 0u64;
        for pos in (0..NUM_SQUARES).map(Position::from_index) {
            if !pos.is_dark() {
                continue;
            }
            let row = pos.row as usize;
            if row < START_ROWS {
                black |= bit(pos.index());
            } else if row >= BOARD_SIZE - START_ROWS {
                red |= bit(pos.index());
            }
        }
        Self { red, black }
    }

    pub fn empty() -> Self {
        Self { red: 0, black: 0 }
    }

    pub fn from_bitboards(red: u64, black: u64) -> Self {
        debug_assert_eq!(red & black, 0, "a square cannot hold two pieces");
        Self { red, black }
    }

    /// Builds a board holding exactly the listed pieces.
    pub fn from_pieces(red: &[Position], black: &[Position]) -> Self {
        let mut board = Self::empty();
        for &pos in red {
            board.set(pos, Cell::Red);
        }
        for &pos in black {
            board.set(pos, Cell::Black);
        }
        board
    }

    pub fn cell(&self, pos: Position) -> Cell {
        let square = bit(pos.index());
        if (self.red & square) != 0 {
            Cell::Red
        } else if (self.black & square) != 0 {
            Cell::Black
        } else {
            Cell::Empty
        }
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        let square = bit(pos.index());
        self.red &= !square;
        self.black &= !square;
        match cell {
            Cell::Empty => {}
            Cell::Red => self.red |= square,
            Cell::Black => self.black |= square,
        }
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        ((self.red | self.black) & bit(pos.index())) == 0
    }

    /// Occupancy mask for one side.
    pub fn pieces(&self, side: Side) -> u64 {
        match side {
            Side::Red => self.red,
            Side::Black => self.black,
        }
    }

    /// Squares holding a piece of `side`, in row-major order.
    pub fn positions(&self, side: Side) -> impl Iterator<Item = Position> {
        let mut bits = self.pieces(side);
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let idx = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(Position::from_index(idx))
        })
    }

    /// Returns `(red_count, black_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.red.count_ones() as u8, self.black.count_ones() as u8)
    }

    pub fn count_for(&self, side: Side) -> u8 {
        self.pieces(side).count_ones() as u8
    }

    /// Moves one piece and removes the jumped piece, if any.
    /// Returns `false` and leaves the board unchanged when the origin is
    /// empty, the destination is occupied, or the captured square does not
    /// hold an opposing piece.
    pub fn apply(&mut self, mv: &Move) -> bool {
        let Some(side) = self.cell(mv.from).side() else {
            return false;
        };
        if !self.is_empty_at(mv.to) {
            return false;
        }
        if let Some(captured) = mv.captured
            && self.cell(captured).side() != Some(side.opponent())
        {
            return false;
        }

        self.set(mv.from, Cell::Empty);
        self.set(mv.to, Cell::from(side));
        if let Some(captured) = mv.captured {
            self.set(captured, Cell::Empty);
        }
        true
    }

    /// Applies every step of a turn. Stops at, and reports, the first step
    /// that does not fit the board.
    pub fn apply_turn(&mut self, turn: &Turn) -> bool {
        turn.steps().iter().all(|mv| self.apply(mv))
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=red, 2=black.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (idx, cell) in board.iter_mut().enumerate() {
            *cell = match self.cell(Position::from_index(idx)) {
                Cell::Empty => 0,
                Cell::Red => 1,
                Cell::Black => 2,
            };
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE as u8 {
            for col in 0..BOARD_SIZE as u8 {
                let symbol = match self.cell(Position::new(row, col)) {
                    Cell::Empty => '.',
                    Cell::Red => 'r',
                    Cell::Black => 'b',
                };
                write!(f, "{symbol}")?;
            }
            if row + 1 < BOARD_SIZE as u8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn bit(idx: usize) -> u64 {
    if idx < NUM_SQUARES { 1u64 << idx } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn initial_board_has_twelve_pieces_per_side_on_dark_squares() {
        let board = Board::new();

        assert_eq!(board.count(), (12, 12));
        assert!(board.positions(Side::Red).all(|p| p.is_dark() && p.row >= 5));
        assert!(board.positions(Side::Black).all(|p| p.is_dark() && p.row <= 2));
        assert_eq!(board.cell(pos(0, 1)), Cell::Black);
        assert_eq!(board.cell(pos(7, 0)), Cell::Red);
        assert_eq!(board.cell(pos(4, 3)), Cell::Empty);
    }

    #[test]
    fn display_renders_rows_top_down() {
        let board = Board::new();
        let text = board.to_string();
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], ".b.b.b.b");
        assert_eq!(rows[3], "........");
        assert_eq!(rows[7], "r.r.r.r.");
    }

    #[test]
    fn apply_capture_removes_exactly_the_jumped_piece() {
        let mut board = Board::from_pieces(&[pos(5, 4)], &[pos(4, 3), pos(0, 1)]);

        let applied = board.apply(&Move::capture(pos(5, 4), pos(3, 2), pos(4, 3)));

        assert!(applied);
        assert_eq!(board.count(), (1, 1));
        assert_eq!(board.cell(pos(3, 2)), Cell::Red);
        assert_eq!(board.cell(pos(5, 4)), Cell::Empty);
        assert_eq!(board.cell(pos(4, 3)), Cell::Empty);
        assert_eq!(board.cell(pos(0, 1)), Cell::Black);
    }

    #[test]
    fn apply_onto_occupied_square_keeps_board_unchanged() {
        let mut board = Board::new();
        let before = board;

        let applied = board.apply(&Move::simple(pos(5, 0), pos(6, 1)));

        assert!(!applied);
        assert_eq!(board, before);
    }

    #[test]
    fn apply_rejects_capture_of_own_piece() {
        let mut board = Board::from_pieces(&[pos(5, 4), pos(4, 3)], &[]);
        let before = board;

        assert!(!board.apply(&Move::capture(pos(5, 4), pos(3, 2), pos(4, 3))));
        assert_eq!(board, before);
    }

    #[test]
    fn to_array_uses_player_codes() {
        let board = Board::from_pieces(&[pos(7, 0)], &[pos(0, 7)]);
        let cells = board.to_array();

        assert_eq!(cells[56], 1);
        assert_eq!(cells[7], 2);
        assert_eq!(cells.iter().filter(|&&c| c != 0).count(), 2);
    }
}

use std::fmt;

use serde::Serialize;

use crate::rules::Move;

pub const BOARD_WIDTH: u8 = 8;
pub const PLAYER_RED: u8 = 1;
pub const PLAYER_BLACK: u8 = 2;

/// A board coordinate. Row 0 is the top edge, where Black starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Returns `None` when either coordinate is off the board.
    pub fn checked(row: u8, col: u8) -> Option<Self> {
        (row < BOARD_WIDTH && col < BOARD_WIDTH).then_some(Self { row, col })
    }

    pub fn from_index(idx: usize) -> Self {
        debug_assert!(idx < (BOARD_WIDTH as usize).pow(2));
        Self {
            row: (idx / BOARD_WIDTH as usize) as u8,
            col: (idx % BOARD_WIDTH as usize) as u8,
        }
    }

    pub fn index(self) -> usize {
        self.row as usize * BOARD_WIDTH as usize + self.col as usize
    }

    /// Steps `(dr, dc)` away from this square, or `None` past the edge.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..BOARD_WIDTH as i8).contains(&row) && (0..BOARD_WIDTH as i8).contains(&col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Pieces only ever stand on dark squares.
    pub fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the two players. Red is always the user, Black the computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Red,
    Black,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Row delta of a forward step: Red plays up the board, Black down.
    pub fn forward(self) -> i8 {
        match self {
            Side::Red => -1,
            Side::Black => 1,
        }
    }

    pub fn as_player(self) -> u8 {
        match self {
            Side::Red => PLAYER_RED,
            Side::Black => PLAYER_BLACK,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Red => "red",
            Side::Black => "black",
        })
    }
}

/// Controller state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    AwaitingUserMove,
    ComputerThinking,
    GameOver,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// Row-major cells: 0=empty, 1=red, 2=black.
    pub board: Vec<u8>,
    pub current_player: u8,
    pub red_count: u8,
    pub black_count: u8,
    pub phase: Phase,
    pub is_game_over: bool,
    pub winner: Option<u8>,
    pub selected: Option<Position>,
    /// Contract:
    /// - `Some(square)` while a capture chain is unfinished; only the piece
    ///   on `square` may move.
    /// - `None` otherwise.
    pub pending_chain: Option<Position>,
    /// Steps of the most recent (possibly still running) turn.
    pub last_turn: Vec<Move>,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub winner: u8,
    pub red_count: u8,
    pub black_count: u8,
}

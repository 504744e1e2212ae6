//! Error types for the game controller and its configuration.

use crate::types::{Position, Side};

/// Errors that can occur while driving a game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The requested move is not in the legal move set.
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Position, to: Position },

    /// The square cannot be selected by the side to move.
    #[error("cannot select square {pos}")]
    InvalidSelection { pos: Position },

    /// A move was requested without a selected piece.
    #[error("no piece selected")]
    NoPieceSelected,

    #[error("it is not {side}'s turn")]
    NotYourTurn { side: Side },

    #[error("game is already over")]
    GameOver,

    #[error("row/col out of range: ({row}, {col})")]
    OutOfRange { row: u8, col: u8 },

    /// A deferred computer turn outlived the game it was scheduled for.
    #[error("computer turn was cancelled by a new game")]
    Cancelled,

    /// The opponent strategy returned nothing, or a turn that is not legal.
    #[error("computer opponent failed: {message}")]
    Opponent { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;

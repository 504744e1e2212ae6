use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod rules;
pub mod types;
pub mod wasm;

pub use board::{Board, Cell};
pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use game::GameInstance;
pub use rules::{Move, MoveDirections, RuleSet, Turn};
pub use types::{Position, Side};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

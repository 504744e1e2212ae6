//! Computer opponents. Each strategy picks a whole turn for its side.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::GameConfig;
use crate::rules::{RuleSet, Turn};
use crate::types::Side;

pub mod random;
pub mod search;

pub use random::RandomOpponent;
pub use search::Searcher;

pub trait Opponent: Send {
    /// Returns `None` only when `side` has no legal turn.
    fn select_turn(&mut self, board: &Board, side: Side, rules: RuleSet) -> Option<Turn>;

    fn name(&self) -> &'static str;
}

/// Selectable opponent strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpponentKind {
    Random,
    #[default]
    Minimax,
}

/// Deterministic alpha-beta opponent.
#[derive(Debug, Clone, Copy)]
pub struct MinimaxOpponent {
    depth: u8,
    timeout: Duration,
}

impl MinimaxOpponent {
    pub fn new(depth: u8, timeout: Duration) -> Self {
        Self { depth, timeout }
    }
}

impl Opponent for MinimaxOpponent {
    fn select_turn(&mut self, board: &Board, side: Side, rules: RuleSet) -> Option<Turn> {
        Searcher::with_timeout(rules, self.depth, self.timeout).best_turn(board, side)
    }

    fn name(&self) -> &'static str {
        "minimax"
    }
}

pub fn build_opponent(config: &GameConfig) -> Box<dyn Opponent> {
    match config.opponent {
        OpponentKind::Random => Box::new(match config.seed {
            Some(seed) => RandomOpponent::with_seed(seed),
            None => RandomOpponent::new(),
        }),
        OpponentKind::Minimax => Box::new(MinimaxOpponent::new(
            config.search_depth(),
            config.search_timeout(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_opponent_follows_config_kind() {
        let minimax = build_opponent(&GameConfig::default());
        let random = build_opponent(&GameConfig {
            opponent: OpponentKind::Random,
            seed: Some(9),
            ..GameConfig::default()
        });

        assert_eq!(minimax.name(), "minimax");
        assert_eq!(random.name(), "random");
    }

    #[test]
    fn minimax_opponent_picks_a_legal_turn() {
        let board = Board::new();
        let rules = RuleSet::default();
        let mut opponent = MinimaxOpponent::new(3, Duration::from_secs(5));

        let turn = opponent.select_turn(&board, Side::Black, rules).unwrap();

        assert!(rules.turns_for(&board, Side::Black).contains(&turn));
    }
}

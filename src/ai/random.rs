use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ai::Opponent;
use crate::board::Board;
use crate::rules::{RuleSet, Turn};
use crate::types::Side;

/// Plays a uniformly random legal turn.
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for RandomOpponent {
    fn select_turn(&mut self, board: &Board, side: Side, rules: RuleSet) -> Option<Turn> {
        let mut turns = rules.turns_for(board, side);
        if turns.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..turns.len());
        Some(turns.swap_remove(idx))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn always_picks_a_legal_turn() {
        let mut opponent = RandomOpponent::with_seed(7);
        let board = Board::new();
        let legal = RuleSet::default().turns_for(&board, Side::Black);

        for _ in 0..50 {
            let turn = opponent
                .select_turn(&board, Side::Black, RuleSet::default())
                .unwrap();
            assert!(legal.contains(&turn));
        }
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let board = Board::new();
        let mut a = RandomOpponent::with_seed(42);
        let mut b = RandomOpponent::with_seed(42);

        for _ in 0..10 {
            assert_eq!(
                a.select_turn(&board, Side::Black, RuleSet::default()),
                b.select_turn(&board, Side::Black, RuleSet::default())
            );
        }
    }

    #[test]
    fn respects_mandatory_capture() {
        let board = Board::from_pieces(&[pos(3, 2)], &[pos(2, 1), pos(0, 7)]);
        let mut opponent = RandomOpponent::with_seed(1);

        for _ in 0..10 {
            let turn = opponent
                .select_turn(&board, Side::Black, RuleSet::default())
                .unwrap();
            assert_eq!(turn.captures(), 1);
            assert_eq!(turn.origin(), pos(2, 1));
        }
    }

    #[test]
    fn returns_none_without_moves() {
        let board = Board::from_pieces(&[pos(5, 0)], &[]);
        let mut opponent = RandomOpponent::with_seed(3);

        assert_eq!(opponent.select_turn(&board, Side::Black, RuleSet::default()), None);
    }
}

//! Legal move generation: mandatory capture, chain continuation and
//! full-turn expansion.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell};
use crate::types::{Position, Side};

const COL_STEPS: [i8; 2] = [-1, 1];
const FORWARD_RED: [i8; 1] = [-1];
const FORWARD_BLACK: [i8; 1] = [1];
const BOTH_WAYS: [i8; 2] = [-1, 1];

/// Which diagonals a man may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirections {
    /// Men step and jump towards the opponent's side only.
    #[default]
    ForwardOnly,
    /// Men step and jump along all four diagonals.
    AllDiagonals,
}

impl MoveDirections {
    fn row_steps(self, side: Side) -> &'static [i8] {
        match (self, side) {
            (Self::ForwardOnly, Side::Red) => &FORWARD_RED,
            (Self::ForwardOnly, Side::Black) => &FORWARD_BLACK,
            (Self::AllDiagonals, _) => &BOTH_WAYS,
        }
    }
}

/// A single piece transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    /// Present iff the move is a jump.
    pub captured: Option<Position>,
}

impl Move {
    pub fn simple(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            captured: None,
        }
    }

    pub fn capture(from: Position, to: Position, captured: Position) -> Self {
        Self {
            from,
            to,
            captured: Some(captured),
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// Everything one side does in one turn: a single simple move, or a chain of
/// captures by the same piece that ends when no further capture is possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    steps: Vec<Move>,
}

impl Turn {
    pub fn single(mv: Move) -> Self {
        Self { steps: vec![mv] }
    }

    pub fn steps(&self) -> &[Move] {
        &self.steps
    }

    /// First step; turns are never empty.
    pub fn first(&self) -> Move {
        self.steps[0]
    }

    pub fn origin(&self) -> Position {
        self.first().from
    }

    pub fn destination(&self) -> Position {
        self.steps[self.steps.len() - 1].to
    }

    pub fn captures(&self) -> usize {
        self.steps.iter().filter(|mv| mv.is_capture()).count()
    }

    pub fn into_steps(self) -> Vec<Move> {
        self.steps
    }
}

/// Rule knobs shared by the controller and the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleSet {
    pub directions: MoveDirections,
}

impl RuleSet {
    pub fn new(directions: MoveDirections) -> Self {
        Self { directions }
    }

    /// Legal moves for `side`. When any capture exists anywhere on the board
    /// the result holds captures only.
    pub fn moves_for(&self, board: &Board, side: Side) -> Vec<Move> {
        let captures: Vec<Move> = board
            .positions(side)
            .flat_map(|pos| self.captures_from(board, pos))
            .collect();
        if !captures.is_empty() {
            return captures;
        }

        board
            .positions(side)
            .flat_map(|pos| self.simple_moves_from(board, pos))
            .collect()
    }

    /// Captures available to the piece on `pos` alone. Empty for an empty
    /// square.
    pub fn captures_from(&self, board: &Board, pos: Position) -> Vec<Move> {
        let Some(side) = board.cell(pos).side() else {
            return Vec::new();
        };
        let enemy = Cell::from(side.opponent());

        let mut out = Vec::new();
        for &dr in self.directions.row_steps(side) {
            for dc in COL_STEPS {
                let Some(over) = pos.offset(dr, dc) else {
                    continue;
                };
                let Some(land) = over.offset(dr, dc) else {
                    continue;
                };
                if board.cell(over) == enemy && board.is_empty_at(land) {
                    out.push(Move::capture(pos, land, over));
                }
            }
        }
        out
    }

    fn simple_moves_from(&self, board: &Board, pos: Position) -> Vec<Move> {
        let Some(side) = board.cell(pos).side() else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for &dr in self.directions.row_steps(side) {
            for dc in COL_STEPS {
                if let Some(to) = pos.offset(dr, dc)
                    && board.is_empty_at(to)
                {
                    out.push(Move::simple(pos, to));
                }
            }
        }
        out
    }

    pub fn has_moves(&self, board: &Board, side: Side) -> bool {
        !self.moves_for(board, side).is_empty()
    }

    /// Every legal full turn for `side`. Capture chains are expanded
    /// depth-first, one branch per continuation.
    pub fn turns_for(&self, board: &Board, side: Side) -> Vec<Turn> {
        let mut turns = Vec::new();
        for mv in self.moves_for(board, side) {
            if mv.is_capture() {
                self.extend_chain(*board, vec![mv], &mut turns);
            } else {
                turns.push(Turn::single(mv));
            }
        }
        turns
    }

    fn extend_chain(&self, mut board: Board, path: Vec<Move>, out: &mut Vec<Turn>) {
        let last = path[path.len() - 1];
        board.apply(&last);

        let next = self.captures_from(&board, last.to);
        if next.is_empty() {
            out.push(Turn { steps: path });
            return;
        }
        for mv in next {
            let mut branch = path.clone();
            branch.push(mv);
            self.extend_chain(board, branch, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    fn forward() -> RuleSet {
        RuleSet::new(MoveDirections::ForwardOnly)
    }

    fn all_diagonals() -> RuleSet {
        RuleSet::new(MoveDirections::AllDiagonals)
    }

    #[test]
    fn single_forward_capture_is_the_only_move() {
        let board = Board::from_pieces(&[pos(5, 4)], &[pos(4, 3)]);

        let moves = forward().moves_for(&board, Side::Red);

        assert_eq!(moves, vec![Move::capture(pos(5, 4), pos(3, 2), pos(4, 3))]);
    }

    #[test]
    fn initial_position_gives_red_seven_simple_moves() {
        let board = Board::new();

        for rules in [forward(), all_diagonals()] {
            let moves = rules.moves_for(&board, Side::Red);
            assert_eq!(moves.len(), 7);
            assert!(moves.iter().all(|mv| !mv.is_capture()));
            assert!(moves.iter().all(|mv| mv.from.row == 5 && mv.to.row == 4));
        }
    }

    #[test]
    fn mandatory_capture_excludes_simple_moves_of_other_pieces() {
        // Red (7,0) could step freely, but (5,4) has a capture.
        let board = Board::from_pieces(&[pos(5, 4), pos(7, 0)], &[pos(4, 5)]);

        let moves = forward().moves_for(&board, Side::Red);

        assert_eq!(moves, vec![Move::capture(pos(5, 4), pos(3, 6), pos(4, 5))]);
    }

    #[test]
    fn moves_never_mix_captures_and_simple_moves() {
        let boards = [
            Board::new(),
            Board::from_pieces(&[pos(5, 0), pos(5, 2), pos(6, 5)], &[pos(4, 1), pos(2, 5)]),
            Board::from_pieces(&[pos(3, 2)], &[pos(2, 1), pos(2, 3), pos(4, 3)]),
        ];

        for board in boards {
            for side in [Side::Red, Side::Black] {
                for rules in [forward(), all_diagonals()] {
                    let moves = rules.moves_for(&board, side);
                    let captures = moves.iter().filter(|mv| mv.is_capture()).count();
                    assert!(captures == 0 || captures == moves.len());
                }
            }
        }
    }

    #[test]
    fn destinations_are_empty_before_the_move() {
        let board = Board::from_pieces(
            &[pos(5, 0), pos(5, 2), pos(4, 3), pos(7, 6)],
            &[pos(3, 2), pos(2, 1), pos(6, 5)],
        );

        for side in [Side::Red, Side::Black] {
            for rules in [forward(), all_diagonals()] {
                for mv in rules.moves_for(&board, side) {
                    assert!(board.is_empty_at(mv.to), "{mv:?} lands on a piece");
                    assert_eq!(board.cell(mv.from).side(), Some(side));
                }
            }
        }
    }

    #[test]
    fn edge_pieces_do_not_jump_off_the_board() {
        let board = Board::from_pieces(&[pos(1, 0)], &[pos(0, 1)]);

        let moves = forward().moves_for(&board, Side::Red);

        assert!(moves.is_empty());
    }

    #[test]
    fn backward_capture_depends_on_direction_rule() {
        // Black piece sits behind Red.
        let board = Board::from_pieces(&[pos(3, 2)], &[pos(4, 3)]);

        let forward_moves = forward().moves_for(&board, Side::Red);
        let any_moves = all_diagonals().moves_for(&board, Side::Red);

        assert!(forward_moves.iter().all(|mv| !mv.is_capture()));
        assert_eq!(any_moves, vec![Move::capture(pos(3, 2), pos(5, 4), pos(4, 3))]);
    }

    #[test]
    fn black_moves_down_the_board() {
        let board = Board::new();

        let moves = forward().moves_for(&board, Side::Black);

        assert_eq!(moves.len(), 7);
        assert!(moves.iter().all(|mv| mv.from.row == 2 && mv.to.row == 3));
    }

    #[test]
    fn captures_from_only_considers_that_piece() {
        let board = Board::from_pieces(&[pos(5, 4), pos(5, 0)], &[pos(4, 3), pos(4, 1)]);

        let from_left = forward().captures_from(&board, pos(5, 0));

        assert_eq!(from_left, vec![Move::capture(pos(5, 0), pos(3, 2), pos(4, 1))]);
        assert!(forward().captures_from(&board, pos(3, 3)).is_empty());
    }

    #[test]
    fn turns_expand_double_jump_into_one_turn() {
        let board = Board::from_pieces(&[pos(6, 1)], &[pos(5, 2), pos(3, 4)]);

        let turns = forward().turns_for(&board, Side::Red);

        assert_eq!(turns.len(), 1);
        let turn = &turns[0];
        assert_eq!(
            turn.steps(),
            &[
                Move::capture(pos(6, 1), pos(4, 3), pos(5, 2)),
                Move::capture(pos(4, 3), pos(2, 5), pos(3, 4)),
            ]
        );
        assert_eq!(turn.captures(), 2);
        assert_eq!(turn.destination(), pos(2, 5));
    }

    #[test]
    fn turns_branch_when_a_chain_can_continue_two_ways() {
        let board = Board::from_pieces(&[pos(6, 3)], &[pos(5, 4), pos(3, 4), pos(3, 6)]);

        let turns = forward().turns_for(&board, Side::Red);

        let ends: Vec<Position> = turns.iter().map(Turn::destination).collect();
        assert_eq!(ends, vec![pos(2, 3), pos(2, 7)]);
        assert!(turns.iter().all(|t| t.captures() == 2 && t.origin() == pos(6, 3)));
    }

    #[test]
    fn applying_a_full_turn_removes_every_jumped_piece() {
        let board = Board::from_pieces(&[pos(6, 1)], &[pos(5, 2), pos(3, 4), pos(0, 7)]);
        let turn = forward().turns_for(&board, Side::Red).remove(0);

        let mut next = board;
        assert!(next.apply_turn(&turn));

        assert_eq!(next.count(), (1, 1));
        assert_eq!(next.cell(pos(2, 5)), Cell::Red);
    }
}

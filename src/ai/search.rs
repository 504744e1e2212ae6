use std::time::Duration;

use web_time::Instant;

use crate::board::Board;
use crate::rules::{Move, RuleSet, Turn};
use crate::types::Side;

const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_SEARCH_DEPTH: u8 = 3;
pub const DEEP_SEARCH_DEPTH: u8 = 5;
pub const MAX_SEARCH_DEPTH: u8 = 8;
const DEEP_SEARCH_MIN_CORES: u32 = 4;
/// Score of a position whose side to move has no legal move.
pub const WIN_SCORE: i32 = 1_000;
const MIN_SCORE: i32 = -i32::MAX;
const MAX_SCORE: i32 = i32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchResult {
    /// Index of the best turn in generation order, and its score.
    Complete(usize, i32),
    TimedOut,
}

/// Search depth for a host reporting `cores` logical processors.
pub fn depth_for_concurrency(cores: u32) -> u8 {
    if cores >= DEEP_SEARCH_MIN_CORES {
        DEEP_SEARCH_DEPTH
    } else {
        DEFAULT_SEARCH_DEPTH
    }
}

/// Material balance from `side`'s perspective.
pub fn evaluate(board: &Board, side: Side) -> i32 {
    board.count_for(side) as i32 - board.count_for(side.opponent()) as i32
}

/// Best first step for `side`, searching `depth` plies.
pub fn best_move(board: &Board, side: Side, depth: u8, rules: RuleSet) -> Option<Move> {
    Searcher::new(rules, depth).best_move(board, side)
}

/// Alpha-beta searcher over whole turns: a capture chain counts as one ply.
pub struct Searcher {
    rules: RuleSet,
    start_time: Instant,
    timeout: Duration,
    max_depth: u8,
    timed_out: bool,
}

impl Searcher {
    pub fn new(rules: RuleSet, max_depth: u8) -> Self {
        Self::with_timeout(rules, max_depth, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(rules: RuleSet, max_depth: u8, timeout: Duration) -> Self {
        Self {
            rules,
            start_time: Instant::now(),
            timeout,
            max_depth,
            timed_out: false,
        }
    }

    /// Searches the best full turn for `side`.
    /// Returns `None` when `side` has no legal move or the depth is zero.
    pub fn best_turn(&mut self, board: &Board, side: Side) -> Option<Turn> {
        self.start_time = Instant::now();
        self.timed_out = false;

        if self.max_depth == 0 {
            return None;
        }

        let mut turns = self.rules.turns_for(board, side);
        if turns.len() <= 1 {
            return turns.pop();
        }

        let mut best = 0;
        for depth in 1..=self.max_depth {
            match self.negaalpha(board, side, depth, depth, MIN_SCORE, MAX_SCORE) {
                SearchResult::Complete(idx, score) => {
                    log::debug!("depth {depth}: turn #{idx} scores {score} for {side}");
                    best = idx;
                }
                SearchResult::TimedOut => {
                    log::warn!(
                        "search for {side} timed out at depth {depth}, keeping depth {} result",
                        depth - 1
                    );
                    break;
                }
            }
        }

        Some(turns.swap_remove(best))
    }

    /// First step of [`Searcher::best_turn`].
    pub fn best_move(&mut self, board: &Board, side: Side) -> Option<Move> {
        self.best_turn(board, side).map(|turn| turn.first())
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    fn negaalpha(
        &mut self,
        board: &Board,
        side: Side,
        depth: u8,
        root_depth: u8,
        alpha: i32,
        beta: i32,
    ) -> SearchResult {
        // Depth 1 must always finish, so the clock is ignored there.
        if root_depth > 1 && self.start_time.elapsed() >= self.timeout {
            self.timed_out = true;
            return SearchResult::TimedOut;
        }

        if depth == 0 {
            return SearchResult::Complete(0, evaluate(board, side));
        }

        let turns = self.rules.turns_for(board, side);
        if turns.is_empty() {
            return SearchResult::Complete(0, -WIN_SCORE);
        }

        let mut best_idx = 0;
        let mut best_score = MIN_SCORE;
        let mut alpha = alpha;

        for (idx, turn) in turns.iter().enumerate() {
            let mut next = *board;
            next.apply_turn(turn);
            let result = self.negaalpha(&next, side.opponent(), depth - 1, root_depth, -beta, -alpha);

            match result {
                SearchResult::TimedOut => return SearchResult::TimedOut,
                SearchResult::Complete(_, score) => {
                    let score = -score;
                    // Strictly better only: ties keep the earlier turn.
                    if score > best_score {
                        best_score = score;
                        best_idx = idx;
                    }
                    if score > alpha {
                        alpha = score;
                    }
                    if alpha >= beta {
                        break;
                    }
                }
            }
        }

        SearchResult::Complete(best_idx, best_score)
    }
}

use crate::ai::{Opponent, build_opponent};
use crate::board::Board;
use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::rules::{Move, RuleSet, Turn};
use crate::types::{GameState, Outcome, Phase, Position, Side};

pub const USER_SIDE: Side = Side::Red;
pub const COMPUTER_SIDE: Side = Side::Black;

/// What happened after one user step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The moved piece must capture again; the turn stays with the user.
    ChainContinues,
    TurnComplete,
}

/// Proof that a computer turn was requested for a particular game.
/// Invalidated by [`GameInstance::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputerTicket {
    epoch: u64,
}

pub struct GameInstance {
    board: Board,
    rules: RuleSet,
    current: Side,
    phase: Phase,
    selected: Option<Position>,
    pending_chain: Option<Position>,
    last_turn: Vec<Move>,
    winner: Option<Side>,
    epoch: u64,
    opponent: Box<dyn Opponent>,
}

impl GameInstance {
    pub fn new(rules: RuleSet, opponent: Box<dyn Opponent>) -> Self {
        Self {
            board: Board::new(),
            rules,
            current: USER_SIDE,
            phase: Phase::AwaitingUserMove,
            selected: None,
            pending_chain: None,
            last_turn: Vec::new(),
            winner: None,
            epoch: 0,
            opponent,
        }
    }

    pub fn from_config(config: &GameConfig) -> GameResult<Self> {
        config.validate()?;
        Ok(Self::new(config.rules(), build_opponent(config)))
    }

    /// Starts a new game. Any computer turn requested before this call is
    /// cancelled.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current = USER_SIDE;
        self.phase = Phase::AwaitingUserMove;
        self.selected = None;
        self.pending_chain = None;
        self.last_turn.clear();
        self.winner = None;
        self.epoch = self.epoch.wrapping_add(1);
        log::info!("new game against {} opponent", self.opponent.name());
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    pub fn current_side(&self) -> Side {
        self.current
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn pending_chain(&self) -> Option<Position> {
        self.pending_chain
    }

    /// Legal moves for the side to move. While a chain is pending only the
    /// chaining piece's captures are legal.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.phase == Phase::GameOver {
            return Vec::new();
        }
        match self.pending_chain {
            Some(pos) => self.rules.captures_from(&self.board, pos),
            None => self.rules.moves_for(&self.board, self.current),
        }
    }

    /// Destinations reachable from `from` this step, for highlighting.
    pub fn legal_targets(&self, from: Position) -> Vec<Position> {
        self.legal_moves()
            .into_iter()
            .filter(|mv| mv.from == from)
            .map(|mv| mv.to)
            .collect()
    }

    /// Selects one of the user's pieces that has a legal move.
    pub fn select(&mut self, pos: Position) -> GameResult<()> {
        self.ensure_user_turn()?;
        if self.board.cell(pos).side() != Some(USER_SIDE) || self.legal_targets(pos).is_empty()
        {
            return Err(GameError::InvalidSelection { pos });
        }
        self.selected = Some(pos);
        Ok(())
    }

    pub fn move_selected_to(&mut self, to: Position) -> GameResult<StepOutcome> {
        let from = self.selected.ok_or(GameError::NoPieceSelected)?;
        self.play(from, to)
    }

    /// Plays one user step.
    pub fn play(&mut self, from: Position, to: Position) -> GameResult<StepOutcome> {
        self.ensure_user_turn()?;

        let mv = self
            .legal_moves()
            .into_iter()
            .find(|mv| mv.from == from && mv.to == to)
            .ok_or(GameError::IllegalMove { from, to })?;

        if !self.board.apply(&mv) {
            return Err(GameError::IllegalMove { from, to });
        }
        if self.pending_chain.is_none() {
            self.last_turn.clear();
        }
        self.last_turn.push(mv);

        if mv.is_capture() && !self.rules.captures_from(&self.board, mv.to).is_empty() {
            log::debug!("{USER_SIDE} must keep capturing from {}", mv.to);
            self.pending_chain = Some(mv.to);
            self.selected = Some(mv.to);
            return Ok(StepOutcome::ChainContinues);
        }

        self.finish_turn();
        Ok(StepOutcome::TurnComplete)
    }

    /// Claims the computer's turn. The ticket is redeemed with
    /// [`GameInstance::resolve_computer_turn`], possibly after a delay.
    pub fn begin_computer_turn(&self) -> GameResult<ComputerTicket> {
        self.ensure_computer_turn()?;
        Ok(ComputerTicket { epoch: self.epoch })
    }

    /// Chooses and applies the computer's whole turn, chained captures
    /// included, then hands the turn back to the user.
    pub fn resolve_computer_turn(&mut self, ticket: ComputerTicket) -> GameResult<Turn> {
        if ticket.epoch != self.epoch {
            return Err(GameError::Cancelled);
        }
        self.ensure_computer_turn()?;

        let turn = self
            .opponent
            .select_turn(&self.board, COMPUTER_SIDE, self.rules)
            .ok_or_else(|| GameError::Opponent {
                message: format!("{} opponent returned no turn", self.opponent.name()),
            })?;

        if !self
            .rules
            .turns_for(&self.board, COMPUTER_SIDE)
            .contains(&turn)
        {
            return Err(GameError::Opponent {
                message: format!("{} opponent chose an illegal turn", self.opponent.name()),
            });
        }

        self.board.apply_turn(&turn);
        self.last_turn = turn.steps().to_vec();
        log::debug!(
            "{COMPUTER_SIDE} plays {} -> {} ({} captured)",
            turn.origin(),
            turn.destination(),
            turn.captures()
        );

        self.finish_turn();
        Ok(turn)
    }

    /// Requests and resolves the computer turn without a delay.
    pub fn do_ai_move(&mut self) -> GameResult<Turn> {
        let ticket = self.begin_computer_turn()?;
        self.resolve_computer_turn(ticket)
    }

    pub fn to_game_state(&self) -> GameState {
        let (red_count, black_count) = self.board.count();
        GameState {
            board: self.board.to_array().to_vec(),
            current_player: self.current.as_player(),
            red_count,
            black_count,
            phase: self.phase,
            is_game_over: self.phase == Phase::GameOver,
            winner: self.winner.map(Side::as_player),
            selected: self.selected,
            pending_chain: self.pending_chain,
            last_turn: self.last_turn.clone(),
        }
    }

    /// `None` while the game is still running.
    pub fn to_outcome(&self) -> Option<Outcome> {
        let winner = self.winner?;
        let (red_count, black_count) = self.board.count();
        Some(Outcome {
            winner: winner.as_player(),
            red_count,
            black_count,
        })
    }

    fn ensure_user_turn(&self) -> GameResult<()> {
        match self.phase {
            Phase::GameOver => Err(GameError::GameOver),
            Phase::ComputerThinking => Err(GameError::NotYourTurn { side: USER_SIDE }),
            Phase::AwaitingUserMove => Ok(()),
        }
    }

    fn ensure_computer_turn(&self) -> GameResult<()> {
        match self.phase {
            Phase::GameOver => Err(GameError::GameOver),
            Phase::AwaitingUserMove => Err(GameError::NotYourTurn {
                side: COMPUTER_SIDE,
            }),
            Phase::ComputerThinking => Ok(()),
        }
    }

    /// Passes the turn. A side left without a legal move loses.
    fn finish_turn(&mut self) {
        self.selected = None;
        self.pending_chain = None;
        self.current = self.current.opponent();

        if !self.rules.has_moves(&self.board, self.current) {
            let winner = self.current.opponent();
            self.winner = Some(winner);
            self.phase = Phase::GameOver;
            log::info!("game over: {winner} wins, {} cannot move", self.current);
            return;
        }

        self.phase = if self.current == COMPUTER_SIDE {
            Phase::ComputerThinking
        } else {
            Phase::AwaitingUserMove
        };
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current: Side) {
        self.board = board;
        self.current = current;
        self.phase = if current == COMPUTER_SIDE {
            Phase::ComputerThinking
        } else {
            Phase::AwaitingUserMove
        };
        self.selected = None;
        self.pending_chain = None;
        self.last_turn.clear();
        self.winner = None;
    }
}

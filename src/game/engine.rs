//! Turn-taking state machine on top of a [`Board`].
//!
//! ## Transitions
//!
//! ```text
//! InProgress ── claim occupied cell ──▶ Done(Forfeit(p))
//!     │ ─────── complete a run ───────▶ Done(Win(p))
//!     │ ─────── fill the board ───────▶ Done(Draw)
//!     └──────── anything else ────────▶ InProgress
//!
//! Done(..) ── action ──▶ Done(..)   (terminal replay for the calling player)
//! ```
//!
//! A finished game keeps answering `action` calls so that every player, in
//! round-robin order, receives its own terminal reward.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::Result;
use crate::game::board::{Board, State};
use crate::game::config::GameConfig;
use crate::game::message::MessageKind;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The board filled up without a winning run.
    Draw,
    /// The given player claimed an occupied cell.
    Forfeit(usize),
    /// The given player completed a winning run.
    Win(usize),
}

/// Result of one `action` call, addressed to the player who made it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Board snapshot after the action.
    pub state: State,
    /// Reward for the acting player.
    pub reward: f64,
    /// Whether the game is over.
    pub done: bool,
    /// What happened to the acting player.
    pub message: MessageKind,
}

/// The game engine.
///
/// # Example
/// ```
/// use kinarow::game::{GameConfig, GameEngine, MessageKind};
///
/// let mut engine = GameEngine::new(GameConfig::tic_tac_toe()).unwrap();
/// engine.reset();
/// let step = engine.action(4).unwrap();
/// assert_eq!(step.message, MessageKind::Step);
/// assert_eq!(engine.current_player(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    board: Board,
    current_player: usize,
    outcome: Option<Outcome>,
}

impl GameEngine {
    /// Create a new game.
    ///
    /// Fails with `InvalidConfiguration` if the rules are unusable.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        if config.win_length > config.rows.max(config.cols) {
            warn!(
                win_length = config.win_length,
                rows = config.rows,
                cols = config.cols,
                "win length exceeds both board dimensions, every game will end without a winner"
            );
        }
        let board = Board::new(config.rows, config.cols)?;
        Ok(Self {
            config,
            board,
            current_player: 0,
            outcome: None,
        })
    }

    /// Start a new game with the same rules and return the empty state.
    pub fn reset(&mut self) -> State {
        self.board.reset();
        self.current_player = 0;
        self.outcome = None;
        self.board.state()
    }

    /// Play `index` for the current player.
    ///
    /// Once the game is over the index is ignored and the caller receives the
    /// terminal reward that belongs to it. While the game is in progress an
    /// index outside the board is an `InvalidAction` error and the turn does
    /// not pass.
    pub fn action(&mut self, index: usize) -> Result<Transition> {
        if let Some(outcome) = self.outcome {
            let message = match outcome {
                Outcome::Draw => MessageKind::Draw,
                Outcome::Forfeit(_) => MessageKind::OtherCollided,
                Outcome::Win(winner) if winner == self.current_player => MessageKind::Win,
                Outcome::Win(_) => MessageKind::Lose,
            };
            return Ok(self.respond(message));
        }

        let player = self.current_player;
        // MAX_PLAYERS keeps every player index within u8
        if !self.board.set(index, player as u8)? {
            return Ok(self.finish(Outcome::Forfeit(player), MessageKind::Collision));
        }

        if self.find_in_a_row(index)? {
            return Ok(self.finish(Outcome::Win(player), MessageKind::Win));
        }

        if self.board.is_full() {
            return Ok(self.finish(Outcome::Draw, MessageKind::Draw));
        }

        Ok(self.respond(MessageKind::Step))
    }

    fn finish(&mut self, outcome: Outcome, message: MessageKind) -> Transition {
        trace!(?outcome, "game over");
        self.outcome = Some(outcome);
        self.respond(message)
    }

    fn respond(&mut self, message: MessageKind) -> Transition {
        self.next_player();
        Transition {
            state: self.board.state(),
            reward: self.config.rewards.for_message(message),
            done: self.outcome.is_some(),
            message,
        }
    }

    /// Check whether a winning run passes through `index`.
    pub fn find_in_a_row(&self, index: usize) -> Result<bool> {
        self.board.has_run_through(index, self.config.win_length)
    }

    /// Pass the turn to the next player.
    pub fn next_player(&mut self) {
        self.current_player = (self.current_player + 1) % self.config.players;
    }

    /// Snapshot of the board.
    pub fn state(&self) -> State {
        self.board.state()
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The rules this game was created with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Index of the player whose turn it is.
    pub fn current_player(&self) -> usize {
        self.current_player
    }

    /// Whether the game is over.
    pub fn is_done(&self) -> bool {
        self.outcome.is_some()
    }

    /// How the game ended, `None` while it is in progress.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

//! Fixed rule parameters of a game.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::game::board::{cell_count, MAX_PLAYERS};
use crate::game::message::Rewards;

/// Rules of one K-in-a-row game.
///
/// Board geometry, the number of players and the run length are the only
/// rule parameters. Rewards are attached here so the engine can pay them out.
///
/// # Example
/// ```
/// use kinarow::game::GameConfig;
///
/// let config = GameConfig::default();
/// assert_eq!((config.players, config.rows, config.cols, config.win_length), (2, 3, 3, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of players taking turns.
    pub players: usize,

    /// Board height.
    pub rows: usize,

    /// Board width.
    pub cols: usize,

    /// Length of the run of equal marks that wins the game.
    pub win_length: usize,

    /// Reward constants.
    pub rewards: Rewards,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: 2,
            rows: 3,
            cols: 3,
            win_length: 3,
            rewards: Rewards::default(),
        }
    }
}

impl GameConfig {
    /// Classic two-player tic-tac-toe.
    pub fn tic_tac_toe() -> Self {
        Self::default()
    }

    /// Create a config with the given rules and default rewards.
    pub fn new(players: usize, rows: usize, cols: usize, win_length: usize) -> Self {
        Self {
            players,
            rows,
            cols,
            win_length,
            rewards: Rewards::default(),
        }
    }

    /// Builder method: set the number of players.
    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    /// Builder method: set the board size.
    pub fn with_size(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Builder method: set the winning run length.
    pub fn with_win_length(mut self, win_length: usize) -> Self {
        self.win_length = win_length;
        self
    }

    /// Builder method: set the rewards.
    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = rewards;
        self
    }

    /// Number of cells on the board.
    pub fn cells(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.players <= 1 {
            return Err(Error::config(format!(
                "players must be > 1, got {}",
                self.players
            )));
        }
        if self.players > MAX_PLAYERS {
            return Err(Error::config(format!(
                "at most {} players are supported, got {}",
                MAX_PLAYERS, self.players
            )));
        }
        cell_count(self.rows, self.cols)?;
        if self.win_length <= 1 {
            return Err(Error::config(format!(
                "win_length must be > 1, got {}",
                self.win_length
            )));
        }
        if !self.rewards.is_finite() {
            return Err(Error::config("rewards must be finite numbers"));
        }
        Ok(())
    }
}

//! Players of the game: the [`Agent`] trait and its implementations.
//!
//! # Overview
//!
//! The trainer only ever talks to the capability set in [`Agent`]:
//!
//! 1. `action` picks a cell for the current state
//! 2. `fit` absorbs the transition the engine returned for that action
//! 3. `decay` runs once per agent at the end of every episode
//! 4. `save` persists whatever the agent has learned
//!
//! Restoring is a constructor on the concrete type (see [`QAgent::load`]),
//! because the caller has to re-supply the hyperparameters.
//!
//! # Implementations
//!
//! - [`QAgent`]: tabular Q-learning with epsilon-greedy exploration
//! - [`RandomAgent`]: uniform choice among empty cells
//! - [`HumanAgent`]: reads moves from a terminal
//!
//! [`AgentSpec`] builds any of them from configuration.

use std::path::Path;

use crate::error::Result;
use crate::game::State;

pub mod human;
pub mod qlearning;
pub mod random;
pub mod schedule;
pub mod spec;
pub mod table;

pub use human::HumanAgent;
pub use qlearning::{QAgent, QConfig};
pub use random::RandomAgent;
pub use schedule::EpsilonSchedule;
pub use spec::AgentSpec;
pub use table::{QTable, TableEntry, TableExport};

/// A participant in the game.
///
/// # Example
/// ```ignore
/// struct FirstEmpty;
///
/// impl Agent for FirstEmpty {
///     fn action(&mut self, state: &State) -> Result<usize> {
///         Ok(state.empty_cells().first().copied().unwrap_or(0))
///     }
///
///     fn name(&self) -> &str {
///         "first-empty"
///     }
/// }
/// ```
pub trait Agent {
    /// Choose a cell index for the given state.
    ///
    /// Agents are asked for an action even after the game has ended so that
    /// they can observe their terminal reward; the engine ignores the index in
    /// that case.
    fn action(&mut self, state: &State) -> Result<usize>;

    /// Learn from one transition.
    ///
    /// # Arguments
    /// * `state` - The state the action was chosen in
    /// * `next_state` - The state the engine returned
    /// * `action` - The cell that was played
    /// * `reward` - The reward the engine paid for it
    fn fit(&mut self, _state: &State, _next_state: &State, _action: usize, _reward: f64) {}

    /// End-of-episode hook, called with the 1-based episode number.
    fn decay(&mut self, _episode: u64) {}

    /// Persist learned values to `path`.
    ///
    /// Agents that learn nothing write nothing.
    fn save(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Display name.
    fn name(&self) -> &str;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn action(&mut self, state: &State) -> Result<usize> {
        (**self).action(state)
    }

    fn fit(&mut self, state: &State, next_state: &State, action: usize, reward: f64) {
        (**self).fit(state, next_state, action, reward)
    }

    fn decay(&mut self, episode: u64) {
        (**self).decay(episode)
    }

    fn save(&self, path: &Path) -> Result<()> {
        (**self).save(path)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

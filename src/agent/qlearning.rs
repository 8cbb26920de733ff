//! Tabular Q-learning with epsilon-greedy exploration.
//!
//! ## Update rule
//!
//! ```text
//! Q(s, a) <- (1 - alpha) * Q(s, a) + alpha * (r + gamma * max Q(s', .))
//! ```
//!
//! Exploration follows an [`EpsilonSchedule`]: with probability epsilon the
//! agent plays a random empty cell, otherwise the first cell with the highest
//! value.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::agent::random::random_empty_cell;
use crate::agent::schedule::EpsilonSchedule;
use crate::agent::table::QTable;
use crate::agent::Agent;
use crate::error::{Error, Result};
use crate::game::{cell_count, State};

/// Hyperparameters of a [`QAgent`].
///
/// None of these are persisted with the table; a restored agent must be given
/// the same values again.
///
/// # Example
/// ```
/// use kinarow::agent::QConfig;
///
/// let config = QConfig::for_episodes(1_000_000).with_seed(7);
/// assert_eq!(config.learning_rate, 0.1);
/// assert_eq!(config.schedule(0).end_episode, 500_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QConfig {
    /// Step size `alpha` of the update, in `(0, 1]`.
    pub learning_rate: f64,

    /// Weight `gamma` of the best next-state value, in `[0, 1]`.
    pub discount: f64,

    /// Whether epsilon-greedy exploration is enabled.
    ///
    /// A non-exploring agent always plays its best known cell and never
    /// decays epsilon.
    pub explore: bool,

    /// Exploration schedule.
    ///
    /// `None` derives the window from the length of the training run.
    pub epsilon: Option<EpsilonSchedule>,

    /// Random seed for reproducibility.
    ///
    /// If `None`, the agent seeds itself from system entropy.
    pub seed: Option<u64>,
}

impl Default for QConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.95,
            explore: true,
            epsilon: None,
            seed: None,
        }
    }
}

impl QConfig {
    /// Default hyperparameters with the decay window fitted to a run of
    /// `episodes` episodes.
    pub fn for_episodes(episodes: u64) -> Self {
        Self {
            epsilon: Some(EpsilonSchedule::for_episodes(episodes)),
            ..Default::default()
        }
    }

    /// Configuration for playing with a trained table: no exploration.
    pub fn greedy() -> Self {
        Self {
            explore: false,
            ..Default::default()
        }
    }

    /// Builder method: set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Builder method: set the discount factor.
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Builder method: enable or disable exploration.
    pub fn with_exploration(mut self, explore: bool) -> Self {
        self.explore = explore;
        self
    }

    /// Builder method: set the exploration schedule.
    pub fn with_schedule(mut self, schedule: EpsilonSchedule) -> Self {
        self.epsilon = Some(schedule);
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The configured schedule, or one fitted to `episodes`.
    pub fn schedule(&self, episodes: u64) -> EpsilonSchedule {
        self.epsilon
            .unwrap_or_else(|| EpsilonSchedule::for_episodes(episodes))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::config(format!(
                "learning rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::config(format!(
                "discount must be in [0, 1], got {}",
                self.discount
            )));
        }
        if self.explore {
            if let Some(schedule) = &self.epsilon {
                schedule.validate()?;
            }
        }
        Ok(())
    }
}

/// Tabular Q-learning agent.
///
/// # Example
/// ```
/// use kinarow::agent::{Agent, QAgent, QConfig};
/// use kinarow::game::{GameConfig, GameEngine};
///
/// let mut engine = GameEngine::new(GameConfig::tic_tac_toe()).unwrap();
/// let mut agent = QAgent::new(3, 3, QConfig::greedy().with_seed(1)).unwrap();
///
/// let state = engine.reset();
/// let action = agent.action(&state).unwrap();
/// let t = engine.action(action).unwrap();
/// agent.fit(&state, &t.state, action, t.reward);
/// assert_eq!(agent.table().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct QAgent {
    config: QConfig,
    schedule: EpsilonSchedule,
    epsilon: f64,
    table: QTable,
    rng: StdRng,
}

impl QAgent {
    /// Create an agent with an empty table for a `rows x cols` board.
    ///
    /// Without an explicit schedule the default window is used; see
    /// [`QConfig::for_episodes`] to fit it to a run.
    pub fn new(rows: usize, cols: usize, config: QConfig) -> Result<Self> {
        Self::with_table(QTable::new(rows, cols), config)
    }

    /// Restore an agent from a table written by [`Agent::save`].
    ///
    /// Hyperparameters come from `config`, not from the file. Fails with
    /// `IncompatibleShape` if the table was learned on another board.
    pub fn load(path: &Path, rows: usize, cols: usize, config: QConfig) -> Result<Self> {
        let table = QTable::load(path, rows, cols)?;
        Self::with_table(table, config)
    }

    /// Create an agent around an existing table.
    pub fn with_table(table: QTable, config: QConfig) -> Result<Self> {
        cell_count(table.rows(), table.cols())?;
        config.validate()?;

        let schedule = config.epsilon.unwrap_or_default();
        let epsilon = if config.explore {
            schedule.start_value
        } else {
            0.0
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            schedule,
            epsilon,
            table,
            rng,
        })
    }

    /// Values for `state`, materializing the row on first access.
    pub fn get(&mut self, state: &State) -> &[f64] {
        self.table.get_or_insert(state, &mut self.rng)
    }

    /// Index of the first maximum of the row for `state`.
    pub fn greedy_action(&mut self, state: &State) -> usize {
        let values = self.get(state);
        let mut best = 0;
        for (index, &value) in values.iter().enumerate().skip(1) {
            if value > values[best] {
                best = index;
            }
        }
        best
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// The exploration schedule in use.
    pub fn schedule(&self) -> &EpsilonSchedule {
        &self.schedule
    }

    /// The hyperparameters.
    pub fn config(&self) -> &QConfig {
        &self.config
    }

    /// The learned values.
    pub fn table(&self) -> &QTable {
        &self.table
    }
}

impl Agent for QAgent {
    fn action(&mut self, state: &State) -> Result<usize> {
        if self.config.explore && self.rng.gen::<f64>() < self.epsilon {
            return Ok(random_empty_cell(state, &mut self.rng));
        }
        Ok(self.greedy_action(state))
    }

    fn fit(&mut self, state: &State, next_state: &State, action: usize, reward: f64) {
        let future = self
            .table
            .get_or_insert(next_state, &mut self.rng)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let alpha = self.config.learning_rate;
        let gamma = self.config.discount;
        let row = self.table.get_or_insert(state, &mut self.rng);
        if let Some(q) = row.get_mut(action) {
            *q = (1.0 - alpha) * *q + alpha * (reward + gamma * future);
        }
    }

    fn decay(&mut self, episode: u64) {
        if !self.config.explore {
            return;
        }
        self.epsilon = self.schedule.decay(self.epsilon, episode);
        if episode == self.schedule.end_episode {
            debug!(episode, epsilon = self.epsilon, "exploration window closed");
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.table.save(path)
    }

    fn name(&self) -> &str {
        "q-learning"
    }
}

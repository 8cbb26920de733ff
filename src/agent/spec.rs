//! Configuration-driven agent construction.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, HumanAgent, QAgent, QConfig, RandomAgent};
use crate::error::{Error, Result};
use crate::game::GameConfig;

/// Which kind of agent sits in a seat.
///
/// Serialized with a `kind` tag:
///
/// ```json
/// [
///   { "kind": "q", "load": "dumps/Player0-2-3x3-3-last.json" },
///   { "kind": "random", "seed": 3 },
///   { "kind": "human" }
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentSpec {
    /// A person at the terminal.
    Human,

    /// Uniformly random moves.
    Random {
        /// Seed for reproducible play.
        #[serde(default)]
        seed: Option<u64>,
    },

    /// A Q-learning agent.
    Q {
        /// Table to start from instead of an empty one.
        #[serde(default)]
        load: Option<PathBuf>,

        /// Whether the agent explores; overrides the shared Q-learning config.
        #[serde(default = "default_explore")]
        explore: bool,
    },
}

fn default_explore() -> bool {
    true
}

impl Default for AgentSpec {
    fn default() -> Self {
        AgentSpec::Q {
            load: None,
            explore: true,
        }
    }
}

impl AgentSpec {
    /// Build the agent for seat `player`.
    ///
    /// # Arguments
    /// * `player` - Seat index, offsets any seed so seats do not mirror each other
    /// * `game` - Board the agent plays on
    /// * `q` - Shared Q-learning hyperparameters
    /// * `episodes` - Length of the run, used when `q` has no explicit schedule
    pub fn build(
        &self,
        player: usize,
        game: &GameConfig,
        q: &QConfig,
        episodes: u64,
    ) -> Result<Box<dyn Agent>> {
        let offset = player as u64;
        match self {
            AgentSpec::Human => Ok(Box::new(HumanAgent::stdio(game.cols))),
            AgentSpec::Random { seed } => {
                Ok(Box::new(RandomAgent::new(seed.map(|s| s.wrapping_add(offset)))))
            }
            AgentSpec::Q { load, explore } => {
                let mut config = q
                    .clone()
                    .with_schedule(q.schedule(episodes))
                    .with_exploration(*explore);
                if let Some(seed) = q.seed {
                    config = config.with_seed(seed.wrapping_add(offset));
                }
                let agent = match load {
                    Some(path) => {
                        let agent = QAgent::load(path, game.rows, game.cols, config)?;
                        check_players(&agent, game.players)?;
                        agent
                    }
                    None => QAgent::new(game.rows, game.cols, config)?,
                };
                Ok(Box::new(agent))
            }
        }
    }

    /// Whether this seat is played by a person.
    pub fn is_human(&self) -> bool {
        matches!(self, AgentSpec::Human)
    }
}

/// A loaded table must not hold pieces of players that do not exist.
fn check_players(agent: &QAgent, players: usize) -> Result<()> {
    match agent.table().highest_player() {
        Some(highest) if usize::from(highest) >= players => Err(Error::IncompatibleShape {
            expected: format!("{} players", players),
            found: format!("pieces of player {}", highest),
        }),
        _ => Ok(()),
    }
}

//! Top-level configuration file.
//!
//! One JSON document describes a complete run: the rules, the Q-learning
//! hyperparameters, the training schedule and who sits in each seat. Every
//! section and field is optional.
//!
//! ```json
//! {
//!   "game": { "players": 2, "rows": 4, "cols": 4, "win_length": 4 },
//!   "q_learning": { "learning_rate": 0.1, "discount": 0.95, "seed": 7 },
//!   "training": { "episodes": 1000000, "checkpoint_dir": "dumps" },
//!   "agents": [ { "kind": "random" }, { "kind": "q" } ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agent::{AgentSpec, QConfig};
use crate::error::{Error, Result};
use crate::game::GameConfig;
use crate::training::TrainerConfig;

/// Complete configuration of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rules of the game.
    pub game: GameConfig,

    /// Hyperparameters shared by every Q-learning seat.
    pub q_learning: QConfig,

    /// Training schedule.
    pub training: TrainerConfig,

    /// One entry per seat, in turn order. Empty means a Q-learning agent in
    /// every seat.
    pub agents: Vec<AgentSpec>,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The seat list with the Q-learning default filled in.
    pub fn agent_specs(&self) -> Vec<AgentSpec> {
        if self.agents.is_empty() {
            vec![AgentSpec::default(); self.game.players]
        } else {
            self.agents.clone()
        }
    }

    /// Validate every section and check there is one seat per player.
    pub fn validate(&self) -> Result<()> {
        self.game.validate()?;
        self.q_learning.validate()?;
        self.training.validate()?;
        if !self.agents.is_empty() && self.agents.len() != self.game.players {
            return Err(Error::config(format!(
                "{} agents configured for {} players",
                self.agents.len(),
                self.game.players
            )));
        }
        Ok(())
    }
}

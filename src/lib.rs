//! # kinarow
//!
//! A generalized K-in-a-row game engine with tabular Q-learning agents.
//!
//! Any number of players (two or more) take turns on a `rows x cols` board;
//! the first to line up `win_length` pieces along a row, column or diagonal
//! wins. Agents learn the game by playing it against each other.
//!
//! ## Features
//!
//! - **Generic Rules**: Arbitrary board shape, player count and run length
//! - **Per-Player Rewards**: Every player receives its own terminal transition
//! - **Q-Learning**: Sparse state table, epsilon-greedy play, linear decay
//! - **Checkpointing**: Tables are saved as versioned JSON with a shape tag
//!
//! ## Quick Start
//!
//! ```
//! use kinarow::agent::{QAgent, QConfig};
//! use kinarow::game::{GameConfig, GameEngine};
//! use kinarow::training::{Trainer, TrainerConfig};
//!
//! // 1. Pick the rules
//! let engine = GameEngine::new(GameConfig::tic_tac_toe()).unwrap();
//!
//! // 2. Seat one agent per player
//! let agents = (0..2)
//!     .map(|seed| QAgent::new(3, 3, QConfig::for_episodes(500).with_seed(seed)).unwrap())
//!     .collect();
//!
//! // 3. Train
//! let mut trainer = Trainer::new(TrainerConfig::quick(500), engine, agents).unwrap();
//! let stats = trainer.train().unwrap();
//! assert_eq!(stats.episodes, 500);
//! ```
//!
//! ## Modules
//!
//! - [`game`]: Board, rules and the turn-taking engine
//! - [`agent`]: The `Agent` trait, Q-learning, random and human players
//! - [`training`]: Episode driver and statistics
//! - [`config`]: JSON configuration for complete runs
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            Trainer                              │
//! │  - Round-robin episodes   - Reports and board dumps             │
//! │  - Win/loss statistics    - Periodic checkpoints                │
//! └─────────────────────────────────────────────────────────────────┘
//!                 │                               │
//!                 │ action / reset                │ action / fit / decay
//!                 ▼                               ▼
//!         ┌───────────────┐         ┌─────────────┼─────────────┐
//!         │  GameEngine   │         │             │             │
//!         │   └─ Board    │         ▼             ▼             ▼
//!         └───────────────┘    ┌─────────┐   ┌─────────┐   ┌─────────┐
//!                              │ QAgent  │   │ Random  │   │  Human  │
//!                              │ └─QTable│   │         │   │         │
//!                              └─────────┘   └─────────┘   └─────────┘
//! ```

#![warn(missing_docs)]

/// Agents that play the game.
///
/// Contains the `Agent` trait and the Q-learning, random and human players.
pub mod agent;

/// Configuration files for complete runs.
pub mod config;

/// Crate error type.
pub mod error;

/// The game itself.
///
/// Board geometry, win detection and the turn-taking state machine.
pub mod game;

/// Training driver.
pub mod training;

// Re-export commonly used types at crate root for convenience
pub use agent::{Agent, AgentSpec, QAgent, QConfig};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use game::{GameConfig, GameEngine, MessageKind, State, Transition};
pub use training::{Trainer, TrainerConfig, TrainingStats};

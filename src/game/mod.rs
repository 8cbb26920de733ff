//! The K-in-a-row game: board geometry, rules, and the turn-taking engine.
//!
//! # Overview
//!
//! A game is played by `players` participants on a `rows x cols` board. Players
//! take turns claiming one empty cell each; the first to own `win_length`
//! consecutive cells along a row, a column or a diagonal wins. Claiming an
//! occupied cell forfeits the game for everybody, and a full board with no
//! winner is a draw.
//!
//! Every [`GameEngine::action`] call returns a [`Transition`] addressed to the
//! player who made it, carrying the new state, a reward and a [`MessageKind`].
//!
//! # Example
//!
//! ```
//! use kinarow::game::{GameConfig, GameEngine, MessageKind};
//!
//! let mut engine = GameEngine::new(GameConfig::new(2, 3, 3, 3)).unwrap();
//! engine.reset();
//! for cell in [0, 3, 1, 4] {
//!     engine.action(cell).unwrap();
//! }
//! let t = engine.action(2).unwrap();
//! assert_eq!(t.message, MessageKind::Win);
//! assert_eq!(engine.action(8).unwrap().message, MessageKind::Lose);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod message;

pub use board::{cell_count, Board, Cell, State, MAX_CELLS, MAX_PLAYERS};
pub use config::GameConfig;
pub use engine::{GameEngine, Outcome, Transition};
pub use message::{MessageKind, Rewards};

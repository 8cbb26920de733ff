//! Error types shared by the engine, the agents and the trainer.

use thiserror::Error;

/// Errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A cell index outside the board was played or queried.
    #[error("invalid action: cell {index} is outside a board of {cells} cells")]
    InvalidAction {
        /// The offending index.
        index: usize,
        /// Number of cells on the board.
        cells: usize,
    },

    /// A game, agent or trainer was constructed with unusable parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A persisted Q-table does not match the board it is loaded for.
    #[error("incompatible table shape: expected {expected}, found {found}")]
    IncompatibleShape {
        /// Shape implied by the configuration.
        expected: String,
        /// Shape found in the table.
        found: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A table or config file is not valid JSON for its schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

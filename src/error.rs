//! Error types for the snake crate.
//!
//! Collisions are not errors: they end the game through [`GameStatus`].
//! Everything here is about building a game or talking to a session.
//!
//! [`GameStatus`]: crate::game::GameStatus

/// Errors returned by construction, configuration and session calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The grid dimensions cannot hold a playable board.
    #[error("invalid grid: {reason}")]
    InvalidGrid {
        /// What is wrong with the dimensions.
        reason: String,
    },

    /// A restored game state breaks a board invariant.
    #[error("invalid game state: {reason}")]
    InvalidState {
        /// Which invariant is broken.
        reason: String,
    },

    /// The tick interval must be a positive duration.
    #[error("tick interval must be at least 1ms")]
    InvalidTickInterval,

    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    ConfigIo {
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    ConfigYaml { source: serde_yml::Error },

    /// The session task has stopped and no longer accepts commands.
    #[error("game session is closed")]
    SessionClosed,
}

impl From<serde_yml::Error> for Error {
    fn from(source: serde_yml::Error) -> Self {
        Self::ConfigYaml { source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

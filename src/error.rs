//! Error types
//!
//! Nothing here is fatal: host errors become a short message for the player,
//! storage errors are logged and replaced by defaults.

use thiserror::Error;

use crate::sim::GameKind;

/// Rejected navigation requests
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Complete the previous level first!")]
    LevelLocked { kind: GameKind, level: u8 },

    #[error("Level {0} does not exist")]
    LevelOutOfRange(u8),

    #[error("Pick a game first")]
    NoGameSelected,

    #[error("Unknown game '{0}'")]
    UnknownGame(String),
}

/// Progress/settings storage failures (recovered, never shown to the player)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

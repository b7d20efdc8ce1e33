//! Error types for round generation, sessions and persistence.

use thiserror::Error;

/// Conditions that stop a round or a session from being created.
///
/// Everything else (a draw outside the level interval, an unparseable answer,
/// a missing stats record) is handled by a fallback and never reaches the player.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Failures of the persisted stats/high-score store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store record could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! Error types raised below the engine boundary.

use thiserror::Error;

/// Failures from storage, snapshot codec and configuration.
///
/// None of these ever reach a caller of `GameEngine::dispatch`; the engine
/// logs them and keeps its current state.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("local storage is not available")]
    StorageUnavailable,

    #[error("storage write failed: {0}")]
    StorageWrite(String),

    #[error("storage read failed: {0}")]
    StorageRead(String),

    #[error("snapshot encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("snapshot decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("snapshot field {0} is not a finite number")]
    NonFinite(&'static str),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("timer setup failed: {0}")]
    Timer(String),
}

pub type Result<T> = std::result::Result<T, GameError>;

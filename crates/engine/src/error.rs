use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine is closed")]
    Closed,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("invalid level: {0}")]
    InvalidLevel(String),
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] serde_json::Error),
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MemoryError>;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Session '{0}' lock poisoned by a panicked accessor")]
    SessionPoisoned(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid conversation state: {0}")]
    Json(#[from] serde_json::Error),
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProtocolError>;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid search plan: {0}")]
    InvalidPlan(String),

    #[error("Unknown edit category: {0}")]
    UnknownCategory(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

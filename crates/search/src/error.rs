use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid file type filter '{filter}': {source}")]
    InvalidFileType {
        filter: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

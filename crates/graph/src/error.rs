use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("Asymmetric component edge: '{from}' imports '{to}' but '{to}' does not list '{from}' in imported_by")]
    AsymmetricImport { from: String, to: String },

    #[error("Asymmetric component edge: '{to}' lists '{from}' in imported_by but '{from}' does not import '{to}'")]
    AsymmetricImportedBy { from: String, to: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

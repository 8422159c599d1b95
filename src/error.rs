//! Error types for DocMind.

use thiserror::Error;

/// Library-level error type for DocMind operations.
#[derive(Error, Debug)]
pub enum DocmindError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Coarse classification of every failure the pipeline can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or rejected credentials, invalid settings. Never retried.
    Configuration,
    /// Embedding, index or completion backend unreachable.
    ServiceUnavailable,
    /// The model answered with something unusable.
    Generation,
    /// Unreadable or undecodable input file.
    Input,
}

impl DocmindError {
    /// Map this error into the pipeline's error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocmindError::Config(_) | DocmindError::TomlParse(_) => ErrorKind::Configuration,
            DocmindError::ServiceUnavailable(_)
            | DocmindError::VectorStore(_)
            | DocmindError::Database(_) => ErrorKind::ServiceUnavailable,
            DocmindError::Generation(_) => ErrorKind::Generation,
            DocmindError::InvalidInput(_) | DocmindError::Io(_) | DocmindError::Json(_) => {
                ErrorKind::Input
            }
        }
    }
}

/// Result type alias for DocMind operations.
pub type Result<T> = std::result::Result<T, DocmindError>;

use std::io;

/// Errors that can occur during code-runner operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid glob pattern '{pattern}': {message}")]
    GlobError { pattern: String, message: String },

    #[error("Failed to spawn '{command}': {source}")]
    SpawnError {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Host error: {0}")]
    HostError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for code-runner operations
pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

/// Main error type for petlineage
#[derive(Error, Debug)]
pub enum PetlineageError {
    /// Record fetch errors (transport, HTTP status, deserialization)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Edge derivation referenced an id that was never registered
    #[error("Graph consistency error: {0}")]
    Consistency(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Traversal was cancelled by the caller
    #[error("Traversal cancelled")]
    Cancelled,

    /// Overall traversal deadline elapsed
    #[error("Traversal timed out")]
    Timeout,

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type using PetlineageError
pub type Result<T> = std::result::Result<T, PetlineageError>;

//! Error types for the CLI application.

use carbontrace_filter::{ConfigurationError, EngineError};
use carbontrace_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid filter criterion
    #[error("Invalid filter: {0}")]
    Filter(#[from] ConfigurationError),

    /// Filter step failed
    #[error("Filter failed: {0}")]
    Engine(#[from] EngineError),

    /// Ledger database error
    #[error("Ledger error: {0}")]
    Store(#[from] StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),
}

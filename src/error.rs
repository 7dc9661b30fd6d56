//! Error handling for blockflow
//!
//! Two kinds of failure exist in this crate. Invalid configuration is a
//! recoverable error reported through [`ChainError`] before any thread is
//! spawned. Contract violations (mutating a finalized chain, advancing a
//! poisoned link) are programmer errors and panic instead of returning.

use thiserror::Error;

/// Main error type for blockflow operations
#[derive(Error, Debug)]
pub enum ChainError {
    /// Errors related to chain configuration validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to configuration file parsing
    #[error("Configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Errors related to configuration file serialization
    #[error("Configuration serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for blockflow operations
pub type Result<T> = std::result::Result<T, ChainError>;

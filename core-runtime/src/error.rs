//! Runtime error types.

use thiserror::Error;

/// Errors produced by the runtime layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration is missing, malformed, or fails validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An underlying IO operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A bridge capability failed.
    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Tracking error types.

use thiserror::Error;

/// Errors that can occur while checking a like.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The configured post link does not name a wall post.
    #[error("Couldn't parse link to the wall post: {0:?}")]
    BadPostLink(String),

    /// The configured target does not resolve to a user.
    #[error("Target user {0:?} doesn't exist")]
    UnknownTarget(String),

    /// A remote API call failed.
    #[error("API call failed: {0}")]
    Api(String),
}

/// Result type alias for tracking operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

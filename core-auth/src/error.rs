//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during credential acquisition.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The code-for-token exchange failed for a reason other than the
    /// recoverable validation challenge.
    #[error("Code exchange failed: {0}")]
    Exchange(String),

    /// Token introspection could not produce a verdict. Network trouble while
    /// checking is not the same as "token invalid" and must surface.
    #[error("Token introspection failed: {0}")]
    Introspection(String),

    /// The user cancelled the code prompt or submitted an empty code.
    #[error("The input code was empty")]
    EmptyCode,

    /// The provider demanded validation on the retry that was itself issued
    /// in response to a validation challenge.
    #[error("Validation required twice, aborting authorization")]
    ValidationLoop,

    /// The authorization page could not be presented to the user.
    #[error("Failed to open authorization page: {0}")]
    Browser(String),
}

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

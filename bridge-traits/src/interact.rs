//! User Interaction Abstraction
//!
//! The authorization-code grant needs two things from the host environment:
//! a way to show the provider's authorization page to the user, and a way to
//! collect the code the user pastes back. Both live behind this trait so the
//! orchestration in `core-auth` stays testable without a human.

use async_trait::async_trait;

use crate::error::Result;

/// Human-in-the-loop capability for the interactive authorization step.
///
/// `prompt_code` is the only blocking step in the whole system: it waits
/// indefinitely until the user either supplies a code or cancels the prompt
/// (EOF on a terminal). There is deliberately no timeout.
#[async_trait]
pub trait UserInteraction: Send + Sync {
    /// Present `url` in the user's default interactive environment
    /// (typically the default browser).
    fn open_url(&self, url: &str) -> Result<()>;

    /// Block until the user enters a code, returning `None` if the prompt
    /// was cancelled rather than answered.
    async fn prompt_code(&self, message: &str) -> Result<Option<String>>;
}

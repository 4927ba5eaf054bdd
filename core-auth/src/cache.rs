//! Credential Cache Store
//!
//! Persists a credential as a two-line plain-text record: the numeric user
//! id, then the token. The cache is strictly best-effort; a missing,
//! malformed, or unwritable file never fails an authorization the user is
//! actively waiting on. Single-process usage is assumed, so there is no file
//! locking.

use crate::types::Credential;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads and writes the on-disk credential record.
pub struct CredentialCache {
    path: PathBuf,
}

impl CredentialCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached credential, if a well-formed one exists.
    ///
    /// A missing or unreadable file is a normal state on first run and comes
    /// back as `None` without noise; a file that exists but holds a malformed
    /// record is worth a warning, but is still just a cache miss.
    pub async fn read(&self) -> Option<Credential> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No readable auth cache");
                return None;
            }
        };

        let mut lines = text.lines();
        let id_line = lines.next().unwrap_or("");
        let token_line = lines.next().unwrap_or("");

        if id_line.is_empty() || token_line.is_empty() {
            warn!(path = %self.path.display(), "Auth cache bad format");
            return None;
        }

        let user_id: i64 = match id_line.parse() {
            Ok(id) => id,
            Err(_) => {
                warn!(path = %self.path.display(), "Auth cache bad format");
                return None;
            }
        };

        Some(Credential::new(user_id, token_line))
    }

    /// Persists `credential`, overwriting any previous record.
    ///
    /// Write failures are logged and swallowed; losing the cache must never
    /// abort a successful authorization.
    pub async fn write(&self, credential: &Credential) {
        let record = format!("{}\n{}\n", credential.user_id, credential.token());

        match tokio::fs::write(&self.path, record).await {
            Ok(()) => debug!(path = %self.path.display(), "Auth token has been cached"),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Auth cache could not be written");
            }
        }
    }
}

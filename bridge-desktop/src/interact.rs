//! Desktop User Interaction
//!
//! Opens authorization pages in the default browser and collects pasted
//! codes from stdin.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    interact::UserInteraction,
};
use std::io::{BufRead, Write};
use tracing::debug;

/// Browser-and-terminal interaction for desktop platforms.
///
/// `open_url` hands the URL to the OS default browser; `prompt_code` prints
/// the message to stdout and blocks on a single stdin line. The stdin read
/// runs on the blocking thread pool so the async runtime stays responsive.
pub struct DesktopInteraction;

impl DesktopInteraction {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DesktopInteraction {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserInteraction for DesktopInteraction {
    fn open_url(&self, url: &str) -> Result<()> {
        debug!(url = %url, "Opening URL in default browser");
        webbrowser::open(url)
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to open browser: {}", e)))
    }

    async fn prompt_code(&self, message: &str) -> Result<Option<String>> {
        let message = message.to_string();

        let line = tokio::task::spawn_blocking(move || -> Result<Option<String>> {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "{}", message)?;
            out.flush()?;

            let stdin = std::io::stdin();
            let mut line = String::new();
            let read = stdin.lock().read_line(&mut line)?;

            // EOF before any input means the prompt was cancelled.
            if read == 0 {
                return Ok(None);
            }

            Ok(Some(line.trim().to_string()))
        })
        .await
        .map_err(|e| BridgeError::OperationFailed(format!("Prompt task failed: {}", e)))??;

        Ok(line)
    }
}

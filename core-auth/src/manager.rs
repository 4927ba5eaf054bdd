//! Authorization Orchestrator
//!
//! Ties cache lookup, the interactive code-grant exchange, the bounded
//! validation retry, and cache write-back into a single `authorize()`
//! operation.
//!
//! # Flow
//!
//! ```text
//! authorize()
//!   ├─ cache enabled? ── read record ── introspect ── valid? ── return cached
//!   └─ interactive exchange (at most two iterations)
//!        ├─ Authorized ───────────── cache write-back ── return fresh
//!        └─ ValidationRequired ───── swap redirect URI, retry once;
//!                                    a second challenge is fatal
//! ```
//!
//! The retry is an explicit two-iteration loop over [`Attempt`] rather than
//! recursion guarded by a mutable flag; the bound is structural.

use crate::cache::CredentialCache;
use crate::client::{AuthClient, ExchangeOutcome};
use crate::error::{AuthError, Result};
use crate::types::{AuthSettings, Credential};
use bridge_traits::http::HttpClient;
use bridge_traits::interact::UserInteraction;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const CODE_PROMPT: &str = "Enter the code parameter from browser:";

/// Which iteration of the exchange loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    RetryingAfterValidation,
}

/// Drives the full credential acquisition sequence.
pub struct AuthManager {
    settings: AuthSettings,
    client: AuthClient,
    cache: CredentialCache,
    interaction: Arc<dyn UserInteraction>,
    events: EventBus,
}

impl AuthManager {
    pub fn new(
        settings: AuthSettings,
        http_client: Arc<dyn HttpClient>,
        interaction: Arc<dyn UserInteraction>,
        events: EventBus,
    ) -> Self {
        let cache = CredentialCache::new(settings.cache_path.clone());
        Self {
            settings,
            client: AuthClient::new(http_client),
            cache,
            interaction,
            events,
        }
    }

    /// Acquires a credential, preferring a cached one when allowed.
    ///
    /// A cached record is trusted only after introspection confirms it; a
    /// stale record is silently discarded in favor of a fresh login. The
    /// provider's validation challenge is honored exactly once.
    ///
    /// # Errors
    ///
    /// - [`AuthError::EmptyCode`] when the user cancels the code prompt
    /// - [`AuthError::Exchange`] / [`AuthError::Introspection`] on remote
    ///   failures
    /// - [`AuthError::ValidationLoop`] on a second validation challenge
    pub async fn authorize(&self) -> Result<Credential> {
        self.events.emit(CoreEvent::Auth(AuthEvent::SigningIn));

        match self.authorize_inner().await {
            Ok(credential) => Ok(credential),
            Err(e) => {
                self.events.emit(CoreEvent::Auth(AuthEvent::AuthError {
                    message: e.to_string(),
                }));
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    async fn authorize_inner(&self) -> Result<Credential> {
        if self.settings.use_cache {
            if let Some(cached) = self.cache.read().await {
                if self.client.introspect(&self.settings, cached.token()).await? {
                    info!(user_id = cached.user_id, "Authorized with cached token");
                    self.events.emit(CoreEvent::Auth(AuthEvent::CacheHit {
                        user_id: cached.user_id,
                    }));
                    return Ok(cached);
                }
                debug!("Cached token rejected by introspection, starting fresh login");
            }
        }

        let mut redirect_uri = self.settings.redirect_uri.clone();
        let mut attempt = Attempt::First;

        loop {
            let code = self.obtain_code(&redirect_uri).await?;

            match self
                .client
                .exchange_code(&self.settings, &redirect_uri, &code)
                .await?
            {
                ExchangeOutcome::Authorized(credential) => {
                    if self.settings.use_cache {
                        self.cache.write(&credential).await;
                    }
                    info!(user_id = credential.user_id, "Authorized successfully");
                    self.events.emit(CoreEvent::Auth(AuthEvent::SignedIn {
                        user_id: credential.user_id,
                    }));
                    return Ok(credential);
                }
                ExchangeOutcome::ValidationRequired {
                    redirect_uri: replacement,
                } => {
                    if attempt == Attempt::RetryingAfterValidation {
                        return Err(AuthError::ValidationLoop);
                    }
                    warn!("Additional validation required, retrying with replacement redirect URI");
                    redirect_uri = replacement;
                    attempt = Attempt::RetryingAfterValidation;
                }
            }
        }
    }

    /// Opens the authorization page and blocks until the user pastes the
    /// code parameter back. The sole human-in-the-loop step; no timeout.
    async fn obtain_code(&self, redirect_uri: &str) -> Result<String> {
        let url = self.client.build_authorize_url(&self.settings, redirect_uri)?;

        self.interaction
            .open_url(&url)
            .map_err(|e| AuthError::Browser(e.to_string()))?;

        let code = self
            .interaction
            .prompt_code(CODE_PROMPT)
            .await
            .map_err(|e| AuthError::Browser(e.to_string()))?;

        match code {
            Some(code) if !code.is_empty() => Ok(code),
            _ => Err(AuthError::EmptyCode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockHttpClient, MockInteraction};
    use std::path::Path;

    const EXCHANGE_OK: &str = r#"{"access_token":"T","expires_in":0,"user_id":7}"#;
    const SERVICE_TOKEN_OK: &str = r#"{"access_token":"SVC"}"#;
    const CHECK_TOKEN_VALID: &str = r#"{"response":{"success":1}}"#;
    const CHECK_TOKEN_INVALID: &str = r#"{"response":{"success":0}}"#;
    const NEED_VALIDATION: &str =
        r#"{"error":"need_validation","error_description":"sms sent","redirect_uri":"https://x/cb2"}"#;

    fn settings(cache_path: &Path, use_cache: bool) -> AuthSettings {
        AuthSettings {
            app_id: 123,
            app_secret: "s3cret".to_string(),
            redirect_uri: "https://oauth.vk.com/blank.html".to_string(),
            api_version: "5.85".to_string(),
            permissions: "messages".to_string(),
            cache_path: cache_path.to_path_buf(),
            use_cache,
        }
    }

    fn manager(
        settings: AuthSettings,
        http: Arc<MockHttpClient>,
        interaction: Arc<MockInteraction>,
    ) -> AuthManager {
        AuthManager::new(settings, http, interaction, EventBus::new(16))
    }

    #[tokio::test]
    async fn test_cache_hit_skips_exchange_and_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("auth.cache");
        tokio::fs::write(&cache_path, "12345\nABCDEF\n").await.unwrap();

        let http = Arc::new(MockHttpClient::new());
        http.respond_to("grant_type=client_credentials", SERVICE_TOKEN_OK);
        http.respond_to("secure.checkToken", CHECK_TOKEN_VALID);
        let interaction = Arc::new(MockInteraction::new());

        let manager = manager(settings(&cache_path, true), http.clone(), interaction.clone());
        let credential = manager.authorize().await.unwrap();

        assert_eq!(credential.user_id, 12345);
        assert_eq!(credential.token(), "ABCDEF");
        // No interactive exchange, no browser, no cache rewrite.
        assert_eq!(http.call_count("code="), 0);
        assert!(interaction.opened_urls().is_empty());
        let content = tokio::fs::read_to_string(&cache_path).await.unwrap();
        assert_eq!(content, "12345\nABCDEF\n");
    }

    #[tokio::test]
    async fn test_stale_cache_falls_through_to_fresh_login() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("auth.cache");
        tokio::fs::write(&cache_path, "12345\nSTALE\n").await.unwrap();

        let http = Arc::new(MockHttpClient::new());
        http.respond_to("grant_type=client_credentials", SERVICE_TOKEN_OK);
        http.respond_to("secure.checkToken", CHECK_TOKEN_INVALID);
        http.respond_to("code=", EXCHANGE_OK);
        let interaction = Arc::new(MockInteraction::with_codes(&["CODE"]));

        let manager = manager(settings(&cache_path, true), http, interaction);
        let credential = manager.authorize().await.unwrap();

        assert_eq!(credential.user_id, 7);
        // The stale record is overwritten by the fresh one.
        let content = tokio::fs::read_to_string(&cache_path).await.unwrap();
        assert_eq!(content, "7\nT\n");
    }

    #[tokio::test]
    async fn test_malformed_cache_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("auth.cache");
        // Empty token field: treated as absent cache, no introspection call.
        tokio::fs::write(&cache_path, "12345\n").await.unwrap();

        let http = Arc::new(MockHttpClient::new());
        http.respond_to("code=", EXCHANGE_OK);
        let interaction = Arc::new(MockInteraction::with_codes(&["CODE"]));

        let manager = manager(settings(&cache_path, true), http.clone(), interaction);
        let credential = manager.authorize().await.unwrap();

        assert_eq!(credential.user_id, 7);
        assert_eq!(http.call_count("secure.checkToken"), 0);
    }

    #[tokio::test]
    async fn test_introspection_failure_escalates() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("auth.cache");
        tokio::fs::write(&cache_path, "12345\nABCDEF\n").await.unwrap();

        // No canned responses: introspection fails at the transport level.
        // Network trouble must not be treated as a revoked token.
        let http = Arc::new(MockHttpClient::new());
        let interaction = Arc::new(MockInteraction::with_codes(&["CODE"]));

        let manager = manager(settings(&cache_path, true), http, interaction.clone());
        let result = manager.authorize().await;

        assert!(matches!(result, Err(AuthError::Introspection(_))));
        assert!(interaction.opened_urls().is_empty());
    }

    #[tokio::test]
    async fn test_cache_disabled_goes_straight_to_exchange() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("auth.cache");
        tokio::fs::write(&cache_path, "12345\nABCDEF\n").await.unwrap();

        let http = Arc::new(MockHttpClient::new());
        http.respond_to("code=", EXCHANGE_OK);
        let interaction = Arc::new(MockInteraction::with_codes(&["CODE"]));

        let manager = manager(settings(&cache_path, false), http.clone(), interaction);
        let credential = manager.authorize().await.unwrap();

        assert_eq!(credential.user_id, 7);
        assert_eq!(http.call_count("secure.checkToken"), 0);
        // Caching disabled: the old record is left alone.
        let content = tokio::fs::read_to_string(&cache_path).await.unwrap();
        assert_eq!(content, "12345\nABCDEF\n");
    }

    #[tokio::test]
    async fn test_fresh_login_persists_credential() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("auth.cache");

        let http = Arc::new(MockHttpClient::new());
        http.respond_to("code=", EXCHANGE_OK);
        let interaction = Arc::new(MockInteraction::with_codes(&["CODE"]));

        let manager = manager(settings(&cache_path, true), http, interaction);
        let credential = manager.authorize().await.unwrap();

        assert_eq!(credential.user_id, 7);
        assert_eq!(credential.token(), "T");
        let content = tokio::fs::read_to_string(&cache_path).await.unwrap();
        assert_eq!(content, "7\nT\n");
    }

    #[tokio::test]
    async fn test_validation_challenge_retries_once_with_replacement_uri() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("auth.cache");

        let http = Arc::new(MockHttpClient::new());
        // First exchange (original redirect) challenges; the retry against
        // the replacement URI succeeds.
        http.respond_to("redirect_uri=https%3A%2F%2Foauth.vk.com%2Fblank.html", NEED_VALIDATION);
        http.respond_to("redirect_uri=https%3A%2F%2Fx%2Fcb2", EXCHANGE_OK);
        let interaction = Arc::new(MockInteraction::with_codes(&["CODE1", "CODE2"]));

        let manager = manager(settings(&cache_path, true), http.clone(), interaction.clone());
        let credential = manager.authorize().await.unwrap();

        assert_eq!(credential.user_id, 7);
        assert_eq!(credential.token(), "T");
        let content = tokio::fs::read_to_string(&cache_path).await.unwrap();
        assert_eq!(content, "7\nT\n");

        // The second authorization page also points at the replacement URI.
        let opened = interaction.opened_urls();
        assert_eq!(opened.len(), 2);
        assert!(opened[1].contains("redirect_uri=https%3A%2F%2Fx%2Fcb2"));
    }

    #[tokio::test]
    async fn test_second_validation_challenge_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("auth.cache");

        let http = Arc::new(MockHttpClient::new());
        // Every exchange keeps demanding validation.
        http.respond_to("access_token?client_id", NEED_VALIDATION);
        let interaction = Arc::new(MockInteraction::with_codes(&["C1", "C2", "C3"]));

        let manager = manager(settings(&cache_path, false), http.clone(), interaction.clone());
        let result = manager.authorize().await;

        assert!(matches!(result, Err(AuthError::ValidationLoop)));
        // Exactly two exchange attempts: the original and one retry.
        assert_eq!(http.call_count("code="), 2);
        assert_eq!(interaction.opened_urls().len(), 2);
    }

    #[tokio::test]
    async fn test_cache_write_failure_does_not_fail_authorization() {
        let http = Arc::new(MockHttpClient::new());
        http.respond_to("code=", EXCHANGE_OK);
        let interaction = Arc::new(MockInteraction::with_codes(&["CODE"]));

        let manager = manager(
            settings(Path::new("/nonexistent-dir/auth.cache"), true),
            http,
            interaction,
        );
        let credential = manager.authorize().await.unwrap();

        assert_eq!(credential.user_id, 7);
        assert_eq!(credential.token(), "T");
    }

    #[tokio::test]
    async fn test_cancelled_prompt_is_empty_code_error() {
        let dir = tempfile::tempdir().unwrap();

        let http = Arc::new(MockHttpClient::new());
        let interaction = Arc::new(MockInteraction::new());
        interaction.push_cancelled();

        let manager = manager(
            settings(&dir.path().join("auth.cache"), false),
            http.clone(),
            interaction,
        );
        let result = manager.authorize().await;

        assert!(matches!(result, Err(AuthError::EmptyCode)));
        assert_eq!(http.call_count("access_token"), 0);
    }

    #[tokio::test]
    async fn test_empty_code_is_rejected() {
        let dir = tempfile::tempdir().unwrap();

        let http = Arc::new(MockHttpClient::new());
        let interaction = Arc::new(MockInteraction::with_codes(&[""]));

        let manager = manager(
            settings(&dir.path().join("auth.cache"), false),
            http,
            interaction,
        );

        assert!(matches!(manager.authorize().await, Err(AuthError::EmptyCode)));
    }

    #[tokio::test]
    async fn test_events_on_successful_flow() {
        let dir = tempfile::tempdir().unwrap();

        let http = Arc::new(MockHttpClient::new());
        http.respond_to("code=", EXCHANGE_OK);
        let interaction = Arc::new(MockInteraction::with_codes(&["CODE"]));

        let events = EventBus::new(16);
        let mut stream = events.subscribe();
        let manager = AuthManager::new(
            settings(&dir.path().join("auth.cache"), false),
            http,
            interaction,
            events,
        );

        manager.authorize().await.unwrap();

        assert_eq!(
            stream.try_recv().unwrap(),
            CoreEvent::Auth(AuthEvent::SigningIn)
        );
        assert_eq!(
            stream.try_recv().unwrap(),
            CoreEvent::Auth(AuthEvent::SignedIn { user_id: 7 })
        );
    }
}

//! Authorization Client
//!
//! Talks to the provider's OAuth endpoints: builds the interactive
//! authorization URL, exchanges a user-entered code for a token, and
//! introspects previously issued tokens via a service-level client
//! credentials grant.
//!
//! The expected "needs validation" branch of the exchange is not an error;
//! it is a tagged [`ExchangeOutcome`] variant carrying the replacement
//! redirect URI the provider wants the client to retry with.

use crate::error::{AuthError, Result};
use crate::types::{AuthSettings, Credential};
use bridge_traits::http::{HttpClient, HttpRequest};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

/// Interactive authorization endpoint.
const AUTHORIZE_URL: &str = "https://oauth.vk.com/authorize";
/// Token endpoint, shared by the code exchange and the client-credentials
/// grant.
const TOKEN_URL: &str = "https://oauth.vk.com/access_token";
/// Base URL for API method calls.
const API_BASE_URL: &str = "https://api.vk.com/method";

const DISPLAY: &str = "page";
const RESPONSE_TYPE: &str = "code";
const NEED_VALIDATION: &str = "need_validation";

/// Result of a code-for-token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The provider issued a credential.
    Authorized(Credential),
    /// The provider wants the exchange redone against a different callback
    /// endpoint before it will issue a token.
    ValidationRequired {
        /// Replacement redirect URI supplied by the provider.
        redirect_uri: String,
    },
}

/// Client for the provider's OAuth endpoints.
pub struct AuthClient {
    http_client: Arc<dyn HttpClient>,
}

impl AuthClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Builds the authorization URL the user must visit.
    ///
    /// Deterministic and side-effect free. The redirect URI is a parameter
    /// rather than read from `settings` because the validation retry swaps
    /// it for a provider-supplied replacement.
    pub fn build_authorize_url(&self, settings: &AuthSettings, redirect_uri: &str) -> Result<String> {
        let mut url = Url::parse(AUTHORIZE_URL)
            .map_err(|e| AuthError::Exchange(format!("Invalid authorize URL: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &settings.app_id.to_string());
            query.append_pair("display", DISPLAY);
            query.append_pair("redirect_uri", redirect_uri);
            query.append_pair("scope", &settings.permissions);
            query.append_pair("response_type", RESPONSE_TYPE);
            query.append_pair("v", &settings.api_version);
        }

        Ok(url.to_string())
    }

    /// Exchanges an authorization code for a credential.
    ///
    /// # Errors
    ///
    /// Every failure other than the provider's validation challenge maps to
    /// [`AuthError::Exchange`]; the challenge itself comes back as
    /// [`ExchangeOutcome::ValidationRequired`].
    #[instrument(skip(self, settings, code))]
    pub async fn exchange_code(
        &self,
        settings: &AuthSettings,
        redirect_uri: &str,
        code: &str,
    ) -> Result<ExchangeOutcome> {
        let mut url = Url::parse(TOKEN_URL)
            .map_err(|e| AuthError::Exchange(format!("Invalid token URL: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &settings.app_id.to_string());
            query.append_pair("client_secret", &settings.app_secret);
            query.append_pair("redirect_uri", redirect_uri);
            query.append_pair("code", code);
        }

        debug!("Exchanging authorization code for a token");

        let response = self
            .http_client
            .execute(HttpRequest::get(url.to_string()))
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        let status = response.status;
        let parsed: ExchangeResponse = response.json().map_err(|e| {
            AuthError::Exchange(format!(
                "Token endpoint returned {} with an unreadable body: {}",
                status, e
            ))
        })?;

        if let (Some(user_id), Some(access_token)) = (parsed.user_id, parsed.access_token) {
            return Ok(ExchangeOutcome::Authorized(Credential::new(
                user_id,
                access_token,
            )));
        }

        match parsed.error.as_deref() {
            Some(NEED_VALIDATION) => {
                let redirect_uri = parsed.redirect_uri.ok_or_else(|| {
                    AuthError::Exchange(
                        "Validation challenge without a replacement redirect URI".to_string(),
                    )
                })?;
                warn!("Provider requires additional validation");
                Ok(ExchangeOutcome::ValidationRequired { redirect_uri })
            }
            Some(error) => Err(AuthError::Exchange(format!(
                "{}: {}",
                error,
                parsed.error_description.unwrap_or_default()
            ))),
            None => Err(AuthError::Exchange(format!(
                "Token endpoint returned {} without a token or an error",
                status
            ))),
        }
    }

    /// Asks the provider whether `token` is still valid.
    ///
    /// Obtains a service token via the client-credentials grant, then calls
    /// the introspection method with it. `Ok(false)` means the provider
    /// answered and declared the token invalid; any failure to obtain an
    /// answer is [`AuthError::Introspection`].
    #[instrument(skip(self, settings, token))]
    pub async fn introspect(&self, settings: &AuthSettings, token: &str) -> Result<bool> {
        let service_token = self.service_token(settings).await?;

        let mut url = Url::parse(&format!("{}/secure.checkToken", API_BASE_URL))
            .map_err(|e| AuthError::Introspection(format!("Invalid method URL: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("token", token);
            query.append_pair("client_secret", &settings.app_secret);
            query.append_pair("v", &settings.api_version);
            query.append_pair("access_token", &service_token);
        }

        let response = self
            .http_client
            .execute(HttpRequest::get(url.to_string()))
            .await
            .map_err(|e| AuthError::Introspection(e.to_string()))?;

        let parsed: ApiEnvelope<TokenChecked> = response
            .json()
            .map_err(|e| AuthError::Introspection(format!("Unreadable response: {}", e)))?;

        match (parsed.response, parsed.error) {
            (Some(checked), _) => Ok(checked.success == 1),
            (None, Some(error)) => Err(AuthError::Introspection(format!(
                "API error {}: {}",
                error.error_code, error.error_msg
            ))),
            (None, None) => Err(AuthError::Introspection(
                "Response carried neither a verdict nor an error".to_string(),
            )),
        }
    }

    async fn service_token(&self, settings: &AuthSettings) -> Result<String> {
        let mut url = Url::parse(TOKEN_URL)
            .map_err(|e| AuthError::Introspection(format!("Invalid token URL: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &settings.app_id.to_string());
            query.append_pair("client_secret", &settings.app_secret);
            query.append_pair("grant_type", "client_credentials");
            query.append_pair("v", &settings.api_version);
        }

        debug!("Obtaining service token via client-credentials grant");

        let response = self
            .http_client
            .execute(HttpRequest::get(url.to_string()))
            .await
            .map_err(|e| AuthError::Introspection(e.to_string()))?;

        let status = response.status;
        let parsed: ServiceTokenResponse = response.json().map_err(|e| {
            AuthError::Introspection(format!(
                "Token endpoint returned {} with an unreadable body: {}",
                status, e
            ))
        })?;

        match parsed.access_token {
            Some(token) => Ok(token),
            None => Err(AuthError::Introspection(format!(
                "{}: {}",
                parsed.error.unwrap_or_else(|| "unknown error".to_string()),
                parsed.error_description.unwrap_or_default()
            ))),
        }
    }
}

/// Token endpoint response for the authorization-code grant. Success and
/// error bodies share one shape with disjoint populated fields.
#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    access_token: Option<String>,
    user_id: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
    redirect_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Body of a `secure.checkToken` verdict.
#[derive(Debug, Deserialize)]
struct TokenChecked {
    success: i64,
}

/// Standard API method envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    response: Option<T>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_code: i64,
    error_msg: String,
}

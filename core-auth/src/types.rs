//! Core authentication types.

use core_runtime::config::{ConfigMap, ConfigSpec};
use core_runtime::error::Error as RuntimeError;
use std::path::PathBuf;

/// Configuration key for the application id.
pub const APP_ID_KEY: &str = "APP_ID";
/// Configuration key for the application secret.
pub const APP_SECRET_KEY: &str = "APP_SECRET";
/// Configuration key for the OAuth redirect URI.
pub const REDIRECT_URI_KEY: &str = "REDIRECT_URI";
/// Configuration key for the API version.
pub const API_VERSION_KEY: &str = "API_VERSION";
/// Configuration key for the requested permission scope.
pub const PERMISSIONS_KEY: &str = "PERMISSIONS";
/// Configuration key for the credential cache location.
pub const CACHE_PATH_KEY: &str = "CACHE_PATH";
/// Option label that enables credential caching.
pub const USE_CACHED_TOKEN_OPTION: &str = "USE_CACHED_TOKEN";

const DEFAULT_CACHE_PATH: &str = "auth.cache";
const DEFAULT_API_VERSION: &str = "5.85";
const DEFAULT_PERMISSIONS: &str = "messages";

/// An authorized user identity with its bearer token.
///
/// Created once per successful authorization and never mutated afterwards; a
/// new `authorize()` call replaces it wholesale.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Numeric id of the authorized user.
    pub user_id: i64,
    access_token: String,
}

impl Credential {
    pub fn new(user_id: i64, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            access_token: access_token.into(),
        }
    }

    /// The bearer token for subsequent API calls.
    pub fn token(&self) -> &str {
        &self.access_token
    }
}

// Token must never leak through Debug output.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Application registration parameters for the authorization flow.
///
/// Immutable once built from configuration; the redirect URI is replaced only
/// transiently inside the validation-retry transition, which copies rather
/// than mutates this struct.
#[derive(Clone)]
pub struct AuthSettings {
    /// Application (client) id.
    pub app_id: i64,
    /// Application (client) secret.
    pub app_secret: String,
    /// Redirect URI registered for the application.
    pub redirect_uri: String,
    /// Remote API version string.
    pub api_version: String,
    /// Comma-separated permission scope requested during authorization.
    pub permissions: String,
    /// Where the credential cache lives on disk.
    pub cache_path: PathBuf,
    /// Whether cached credentials may be consulted and persisted.
    pub use_cache: bool,
}

impl AuthSettings {
    /// The configuration contract for the authorization file.
    pub fn config_spec() -> ConfigSpec {
        ConfigSpec::new()
            .required(APP_ID_KEY)
            .required(APP_SECRET_KEY)
            .required(REDIRECT_URI_KEY)
            .with_default(CACHE_PATH_KEY, DEFAULT_CACHE_PATH)
            .with_default(API_VERSION_KEY, DEFAULT_API_VERSION)
            .with_default(PERMISSIONS_KEY, DEFAULT_PERMISSIONS)
    }

    /// Builds settings from a parsed configuration.
    ///
    /// The configuration has already passed required-key validation; the only
    /// remaining failure mode is a non-numeric `APP_ID`.
    pub fn from_config(config: &ConfigMap) -> core_runtime::Result<Self> {
        let app_id_raw = config
            .get(APP_ID_KEY)
            .ok_or_else(|| RuntimeError::Config(format!("{} is missing", APP_ID_KEY)))?;
        let app_id: i64 = app_id_raw.parse().map_err(|_| {
            RuntimeError::Config(format!("{} must be numeric, got {:?}", APP_ID_KEY, app_id_raw))
        })?;

        let get_required = |key: &str| -> core_runtime::Result<String> {
            config
                .get(key)
                .map(str::to_string)
                .ok_or_else(|| RuntimeError::Config(format!("{} is missing", key)))
        };

        Ok(Self {
            app_id,
            app_secret: get_required(APP_SECRET_KEY)?,
            redirect_uri: get_required(REDIRECT_URI_KEY)?,
            api_version: get_required(API_VERSION_KEY)?,
            permissions: get_required(PERMISSIONS_KEY)?,
            cache_path: PathBuf::from(get_required(CACHE_PATH_KEY)?),
            use_cache: config.is_option_set(USE_CACHED_TOKEN_OPTION),
        })
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("api_version", &self.api_version)
            .field("permissions", &self.permissions)
            .field("cache_path", &self.cache_path)
            .field("use_cache", &self.use_cache)
            .finish()
    }
}

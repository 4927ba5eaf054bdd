//! # Core Authentication
//!
//! Credential acquisition and caching for the like tracker.
//!
//! The crate implements an interactive OAuth authorization-code grant
//! (browser + manual code entry), token introspection for deciding whether a
//! cached credential is still usable, a bounded retry for the provider's
//! "additional validation required" challenge, and best-effort persistence
//! of the resulting credential.
//!
//! ## Components
//!
//! - [`AuthManager`] - the orchestrator; one `authorize()` call per run
//! - [`AuthClient`] - the provider's OAuth endpoints
//! - [`CredentialCache`] - the two-line on-disk record
//! - [`AuthSettings`] / [`Credential`] - configuration and result types
//!
//! ## Usage
//!
//! ```ignore
//! use core_auth::{AuthManager, AuthSettings};
//! use core_runtime::config::ConfigMap;
//! use core_runtime::events::EventBus;
//! use std::sync::Arc;
//!
//! let config = ConfigMap::load("authorization.config", &AuthSettings::config_spec())?;
//! let settings = AuthSettings::from_config(&config)?;
//! let manager = AuthManager::new(settings, http_client, interaction, EventBus::default());
//! let credential = manager.authorize().await?;
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod manager;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::CredentialCache;
pub use client::{AuthClient, ExchangeOutcome};
pub use error::{AuthError, Result};
pub use manager::AuthManager;
pub use types::{AuthSettings, Credential};

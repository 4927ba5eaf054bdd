//! # Host Bridge Traits
//!
//! Platform abstraction traits implemented by each host environment.
//!
//! ## Overview
//!
//! This crate defines the contract between the core crates and
//! platform-specific implementations. Each trait represents a capability the
//! core requires but that is provided differently per platform:
//!
//! - [`HttpClient`](http::HttpClient) — async HTTP operations with retry
//! - [`UserInteraction`](interact::UserInteraction) — opening the
//!   authorization page and collecting the pasted OAuth code from the user
//!
//! ## Error handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Platform
//! implementations convert their native errors into it and keep the message
//! actionable.
//!
//! ## Thread safety
//!
//! All bridge traits require `Send + Sync` bounds so they can be shared across
//! async tasks behind `Arc<dyn Trait>`.

pub mod error;
pub mod http;
pub mod interact;

pub use error::{BridgeError, Result};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use interact::UserInteraction;

//! # Desktop Bridge Implementations
//!
//! Default implementations of the bridge traits for desktop platforms
//! (macOS, Windows, Linux):
//!
//! - `HttpClient` using `reqwest`
//! - `UserInteraction` using the default browser (`webbrowser`) and stdin
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DesktopInteraction, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new());
//! let interaction = Arc::new(DesktopInteraction::new());
//! ```

mod http;
mod interact;

pub use http::ReqwestHttpClient;
pub use interact::DesktopInteraction;

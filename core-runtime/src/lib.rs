//! # Core Runtime
//!
//! Shared runtime services for the like tracker:
//!
//! - [`config`] - line-oriented configuration files (`NAME=VALUE`, `#`
//!   comments, `-OPTION` toggles)
//! - [`logging`] - `tracing` initialization with pretty/compact/JSON output
//! - [`events`] - broadcast event bus for progress reporting
//! - [`error`] - runtime-level error types

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{ConfigMap, ConfigSpec};
pub use error::{Error, Result};
pub use events::{AuthEvent, CoreEvent, EventBus};
pub use logging::{init_logging, LogFormat, LoggingConfig};

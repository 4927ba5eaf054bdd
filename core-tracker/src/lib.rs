//! # Core Tracker
//!
//! The post-like lookup that runs after authorization: parse the task
//! configuration, resolve the target user, and ask the API whether they
//! liked the configured wall post.

pub mod error;
pub mod task;
pub mod tracker;

pub use error::{Result, TrackerError};
pub use task::{TaskSettings, WallPost};
pub use tracker::LikeTracker;

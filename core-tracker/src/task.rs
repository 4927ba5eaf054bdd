//! Task configuration and wall-post link parsing.

use crate::error::{Result, TrackerError};
use core_runtime::config::{ConfigMap, ConfigSpec};
use core_runtime::error::Error as RuntimeError;

/// Configuration key naming the user whose like is checked.
pub const TARGET_KEY: &str = "TARGET";
/// Configuration key carrying the link to the wall post.
pub const POST_LINK_KEY: &str = "POST_LINK";

/// Parameters of one like-lookup task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSettings {
    /// Numeric user id or screen name of the user to check.
    pub target: String,
    /// Link to the wall post, e.g. `https://vk.com/wall-1_45616`.
    pub post_link: String,
}

impl TaskSettings {
    /// The configuration contract for the task file.
    pub fn config_spec() -> ConfigSpec {
        ConfigSpec::new().required(TARGET_KEY).required(POST_LINK_KEY)
    }

    pub fn from_config(config: &ConfigMap) -> core_runtime::Result<Self> {
        let get_required = |key: &str| -> core_runtime::Result<String> {
            config
                .get(key)
                .map(str::to_string)
                .ok_or_else(|| RuntimeError::Config(format!("{} is missing", key)))
        };

        Ok(Self {
            target: get_required(TARGET_KEY)?,
            post_link: get_required(POST_LINK_KEY)?,
        })
    }
}

/// A wall post identified by its owner and post ids.
///
/// Owner ids are negative for community walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallPost {
    pub owner_id: i64,
    pub post_id: i64,
}

impl WallPost {
    /// Extracts the owner and post ids from a wall-post link.
    ///
    /// The link is everything up to and including the last `wall` marker
    /// followed by `{owner}_{post}`; both ids must be integers.
    pub fn parse(link: &str) -> Result<Self> {
        let bad_link = || TrackerError::BadPostLink(link.to_string());

        let post_data = link.rsplit("wall").next().ok_or_else(bad_link)?;

        let mut segments = post_data.split('_');
        let owner = segments.next().ok_or_else(bad_link)?;
        let post = segments.next().ok_or_else(bad_link)?;
        if segments.next().is_some() {
            return Err(bad_link());
        }

        let owner_id: i64 = owner.parse().map_err(|_| bad_link())?;
        let post_id: i64 = post.parse().map_err(|_| bad_link())?;

        Ok(Self { owner_id, post_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_settings_from_config() {
        let config = ConfigMap::parse(
            "TARGET=durov\nPOST_LINK=https://vk.com/wall1_100\n",
            &TaskSettings::config_spec(),
        )
        .unwrap();
        let task = TaskSettings::from_config(&config).unwrap();

        assert_eq!(task.target, "durov");
        assert_eq!(task.post_link, "https://vk.com/wall1_100");
    }

    #[test]
    fn test_task_config_requires_both_keys() {
        let result = ConfigMap::parse("TARGET=durov\n", &TaskSettings::config_spec());
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_user_wall_link() {
        let post = WallPost::parse("https://vk.com/wall1_45616").unwrap();
        assert_eq!(post.owner_id, 1);
        assert_eq!(post.post_id, 45616);
    }

    #[test]
    fn test_parse_community_wall_link() {
        let post = WallPost::parse("https://vk.com/wall-22822305_1261926").unwrap();
        assert_eq!(post.owner_id, -22822305);
        assert_eq!(post.post_id, 1261926);
    }

    #[test]
    fn test_parse_bare_wall_reference() {
        let post = WallPost::parse("wall7_42").unwrap();
        assert_eq!(post.owner_id, 7);
        assert_eq!(post.post_id, 42);
    }

    #[test]
    fn test_parse_rejects_link_without_post_id() {
        assert!(matches!(
            WallPost::parse("https://vk.com/wall1"),
            Err(TrackerError::BadPostLink(_))
        ));
    }

    #[test]
    fn test_parse_rejects_extra_segments() {
        assert!(WallPost::parse("https://vk.com/wall1_2_3").is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric_ids() {
        assert!(WallPost::parse("https://vk.com/wallabc_def").is_err());
    }
}

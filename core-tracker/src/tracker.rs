//! Like tracking engine.
//!
//! One outbound lookup per run: resolve the target user if the task names a
//! screen name rather than an id, then ask the API whether that user liked
//! the configured wall post. No state, no retry.

use crate::error::{Result, TrackerError};
use crate::task::{TaskSettings, WallPost};
use bridge_traits::http::{HttpClient, HttpRequest};
use core_auth::Credential;
use core_runtime::events::{CoreEvent, EventBus, TrackerEvent};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use url::Url;

/// Base URL for API method calls.
const API_BASE_URL: &str = "https://api.vk.com/method";

/// Performs the single post-like lookup that follows authorization.
pub struct LikeTracker {
    credential: Credential,
    api_version: String,
    http_client: Arc<dyn HttpClient>,
    events: EventBus,
}

impl LikeTracker {
    pub fn new(
        credential: Credential,
        api_version: impl Into<String>,
        http_client: Arc<dyn HttpClient>,
        events: EventBus,
    ) -> Self {
        Self {
            credential,
            api_version: api_version.into(),
            http_client,
            events,
        }
    }

    /// Runs the configured task: did `TARGET` like `POST_LINK`?
    #[instrument(skip(self, task))]
    pub async fn run(&self, task: &TaskSettings) -> Result<bool> {
        let post = WallPost::parse(&task.post_link)?;
        let target_id = self.resolve_target(&task.target).await?;

        let liked = self.is_post_liked(&post, target_id).await?;
        if liked {
            info!("The post is liked");
        } else {
            info!("The post is not liked");
        }
        self.events
            .emit(CoreEvent::Tracker(TrackerEvent::Checked { liked }));

        Ok(liked)
    }

    /// Turns the configured target into a numeric user id.
    ///
    /// A purely numeric target is already an id; anything else is resolved
    /// as a screen name and must name a user, not a community.
    pub async fn resolve_target(&self, target: &str) -> Result<i64> {
        if !target.is_empty() && target.bytes().all(|b| b.is_ascii_digit()) {
            return target
                .parse()
                .map_err(|_| TrackerError::UnknownTarget(target.to_string()));
        }

        debug!(screen_name = target, "Resolving screen name");

        let mut url = self.method_url("utils.resolveScreenName")?;
        url.query_pairs_mut().append_pair("screen_name", target);

        let resolved: ResolvedScreenName = self.call_api(url).await?;
        if resolved.kind.as_deref() != Some("user") {
            return Err(TrackerError::UnknownTarget(target.to_string()));
        }
        let user_id = resolved
            .object_id
            .ok_or_else(|| TrackerError::UnknownTarget(target.to_string()))?;

        self.events
            .emit(CoreEvent::Tracker(TrackerEvent::TargetResolved {
                screen_name: target.to_string(),
                user_id,
            }));

        Ok(user_id)
    }

    /// Asks the API whether `target_id` liked `post`.
    pub async fn is_post_liked(&self, post: &WallPost, target_id: i64) -> Result<bool> {
        let mut url = self.method_url("likes.isLiked")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("user_id", &target_id.to_string());
            query.append_pair("type", "post");
            query.append_pair("owner_id", &post.owner_id.to_string());
            query.append_pair("item_id", &post.post_id.to_string());
        }

        let response: IsLikedResponse = self.call_api(url).await?;
        Ok(response.liked == 1)
    }

    fn method_url(&self, method: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", API_BASE_URL, method))
            .map_err(|e| TrackerError::Api(format!("Invalid method URL: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("v", &self.api_version);
            query.append_pair("access_token", self.credential.token());
        }

        Ok(url)
    }

    async fn call_api<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self
            .http_client
            .execute(HttpRequest::get(url.to_string()))
            .await
            .map_err(|e| TrackerError::Api(e.to_string()))?;

        let parsed: ApiEnvelope<T> = response
            .json()
            .map_err(|e| TrackerError::Api(format!("Unreadable response: {}", e)))?;

        match (parsed.response, parsed.error) {
            (Some(value), _) => Ok(value),
            (None, Some(error)) => Err(TrackerError::Api(format!(
                "API error {}: {}",
                error.error_code, error.error_msg
            ))),
            (None, None) => Err(TrackerError::Api(
                "Response carried neither a payload nor an error".to_string(),
            )),
        }
    }
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

#[derive(Debug, Deserialize)]
struct ResolvedScreenName {
    #[serde(rename = "type")]
    kind: Option<String>,
    object_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct IsLikedResponse {
    liked: i64,
}

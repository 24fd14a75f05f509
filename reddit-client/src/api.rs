use crate::metrics::{ApiMetrics, MetricsCollector, RequestMetrics};
use crate::rate_limiter::{RateLimitConfig, RateLimitStatus, RateLimiter};
use mood_core::{ConfigError, CoreError, Post, RedditApiError};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListing<T> {
    pub kind: String,
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditPostData {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub score: i64,
}

/// Children of a comment listing: real comments, or "load more" stubs.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum CommentThing {
    #[serde(rename = "t1")]
    Comment(RedditCommentData),
    #[serde(rename = "more")]
    More(IgnoredAny),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditCommentData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub replies: Replies,
}

/// Reddit sends `""` instead of a listing when a comment has no replies.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
pub enum Replies {
    Listing(Box<RedditListing<CommentThing>>),
    Text(String),
    #[default]
    None,
}

impl Replies {
    fn into_children(self) -> Vec<CommentThing> {
        match self {
            Replies::Listing(listing) => listing.data.children,
            Replies::Text(_) | Replies::None => Vec::new(),
        }
    }
}

/// Flatten a comment forest breadth-first: every top-level comment, then
/// their direct replies, and so on. "Load more" stubs are dropped.
pub fn flatten_comments(children: Vec<CommentThing>, limit: usize) -> Vec<RedditCommentData> {
    let mut queue: VecDeque<CommentThing> = children.into();
    let mut flattened = Vec::new();

    while flattened.len() < limit {
        let Some(thing) = queue.pop_front() else {
            break;
        };
        if let CommentThing::Comment(mut comment) = thing {
            let replies = std::mem::take(&mut comment.replies);
            queue.extend(replies.into_children());
            flattened.push(comment);
        }
    }

    flattened
}

impl From<RedditPostData> for Post {
    fn from(post_data: RedditPostData) -> Self {
        Self {
            id: post_data.id,
            title: post_data.title,
            body: post_data.selftext,
            url: post_data.url,
            subreddit: post_data.subreddit,
            permalink: post_data.permalink,
            community_score: post_data.score,
            comments: Vec::new(),
        }
    }
}

impl From<RedditCommentData> for mood_core::Comment {
    fn from(comment: RedditCommentData) -> Self {
        mood_core::Comment::new(comment.body, comment.author, comment.score)
    }
}

pub struct RedditApiClient {
    http_client: Client,
    api_base_url: Url,
    rate_limiter: RateLimiter,
    metrics: MetricsCollector,
}

impl RedditApiClient {
    pub fn new(user_agent: &str, api_base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let api_base_url = Url::parse(api_base_url).map_err(|_| ConfigError::InvalidValue {
            field: "api_base_url".to_string(),
            value: api_base_url.to_string(),
        })?;

        let http_client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            api_base_url,
            rate_limiter: RateLimiter::new(RateLimitConfig::reddit_oauth()),
            metrics: MetricsCollector::new(),
        })
    }

    /// The underlying HTTP client, already configured with the user agent
    /// and timeout.
    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}{}",
            self.api_base_url.as_str().trim_end_matches('/'),
            endpoint
        )
    }

    /// Send one authenticated request, mapping non-success statuses onto
    /// [`RedditApiError`]. `metrics_label` groups requests whose paths differ
    /// only by id.
    pub async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        metrics_label: &str,
        access_token: &str,
        query_params: &[(&str, &str)],
    ) -> Result<Response, CoreError> {
        let _permit = self.rate_limiter.acquire_permit().await?;
        debug!("Acquired rate limit permit for {} {}", method, endpoint);

        let start_time = Instant::now();
        let result = self
            .http_client
            .request(method.clone(), self.endpoint_url(endpoint))
            .bearer_auth(access_token)
            .query(query_params)
            .send()
            .await;

        let status_code = result.as_ref().ok().map(|response| response.status());
        let outcome = match result {
            Ok(response) if response.status().is_success() => {
                debug!("Request successful: {} {}", response.status(), endpoint);
                Ok(response)
            }
            Ok(response) => {
                error!(
                    "Request failed with status: {} for {}",
                    response.status(),
                    endpoint
                );
                Err(status_error(&response, endpoint).into())
            }
            Err(e) => {
                error!("Network error for {} {}: {}", method, endpoint, e);
                if e.is_timeout() {
                    Err(RedditApiError::RequestTimeout.into())
                } else {
                    Err(CoreError::Network(e))
                }
            }
        };

        self.metrics
            .record_request(RequestMetrics {
                endpoint: metrics_label.to_string(),
                method: method.to_string(),
                status_code: status_code.map(|status| status.as_u16()),
                response_time: start_time.elapsed(),
                success: outcome.is_ok(),
                rate_limited: status_code == Some(StatusCode::TOO_MANY_REQUESTS),
            })
            .await;

        outcome
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        metrics_label: &str,
        access_token: &str,
        query_params: &[(&str, &str)],
    ) -> Result<T, CoreError> {
        let response = self
            .make_request(Method::GET, endpoint, metrics_label, access_token, query_params)
            .await?;

        response.json().await.map_err(|e| {
            error!("Failed to parse response from {}: {}", endpoint, e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse response from {endpoint}"),
            })
        })
    }

    /// Search every subreddit for `query`, most relevant first.
    pub async fn search_posts(
        &self,
        access_token: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RedditPostData>, CoreError> {
        let limit = limit.to_string();
        let params = [
            ("q", query),
            ("limit", limit.as_str()),
            ("sort", "relevance"),
            ("t", "all"),
            ("restrict_sr", "true"),
            ("raw_json", "1"),
        ];

        let listing: RedditListing<RedditListingChild<RedditPostData>> = self
            .get_json("/r/all/search", "/r/all/search", access_token, &params)
            .await?;

        let posts: Vec<RedditPostData> = listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .collect();
        info!("Search for '{}' returned {} posts", query, posts.len());
        Ok(posts)
    }

    /// Comments of a post flattened breadth-first, at most `limit`.
    pub async fn get_comments(
        &self,
        access_token: &str,
        post_id: &str,
        limit: usize,
    ) -> Result<Vec<RedditCommentData>, CoreError> {
        let endpoint = format!("/comments/{post_id}");
        let (_, comments): (IgnoredAny, RedditListing<CommentThing>) = self
            .get_json(&endpoint, "/comments", access_token, &[("raw_json", "1")])
            .await?;

        let flattened = flatten_comments(comments.data.children, limit);
        debug!("Retrieved {} comments for post {}", flattened.len(), post_id);
        Ok(flattened)
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.get_metrics().await
    }

    pub async fn export_metrics(&self) -> Result<String, CoreError> {
        Ok(self.metrics.export_metrics().await?)
    }

    pub async fn log_metrics(&self) {
        self.metrics.log_summary().await;
    }

    pub async fn get_rate_limit_status(&self) -> RateLimitStatus {
        self.rate_limiter.status().await
    }
}

fn status_error(response: &Response, endpoint: &str) -> RedditApiError {
    let status = response.status();
    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<f64>().ok())
                .map(|seconds| seconds.ceil() as u64)
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            warn!("Rate limited, retry after {} seconds", retry_after);
            RedditApiError::RateLimitExceeded { retry_after }
        }
        StatusCode::UNAUTHORIZED => RedditApiError::InvalidToken,
        StatusCode::FORBIDDEN => RedditApiError::Forbidden {
            resource: endpoint.to_string(),
        },
        StatusCode::NOT_FOUND => RedditApiError::InvalidResponse {
            details: format!("Resource not found: {endpoint}"),
        },
        status if status.is_server_error() => RedditApiError::ServerError {
            status_code: status.as_u16(),
        },
        status => RedditApiError::InvalidResponse {
            details: format!("Unexpected status {status} from {endpoint}"),
        },
    }
}

pub mod api;
pub mod auth;
pub mod collector;
pub mod metrics;
pub mod rate_limiter;

pub use api::{flatten_comments, RedditApiClient};
pub use auth::RedditAuthenticator;
pub use collector::RedditCollector;
pub use metrics::{ApiMetrics, MetricsCollector};
pub use rate_limiter::{RateLimitConfig, RateLimitStatus, RateLimiter};

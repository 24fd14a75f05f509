use crate::api::RedditApiClient;
use crate::auth::RedditAuthenticator;
use mood_core::{AppConfig, Comment, CoreError, CorpusCollector, CorpusLimits, Post, RedditApiError};
use tracing::{debug, info};

/// [`CorpusCollector`] backed by the Reddit API.
///
/// Posts come from a search across all subreddits; each post's comments are
/// fetched one post at a time, so a search costs `1 + posts` API calls.
pub struct RedditCollector {
    api: RedditApiClient,
    auth: RedditAuthenticator,
}

impl RedditCollector {
    pub fn new(config: &AppConfig) -> Result<Self, CoreError> {
        let credentials = config.reddit_credentials()?;
        let api = RedditApiClient::new(
            &credentials.user_agent,
            &config.api_base_url,
            config.http_timeout(),
        )?;
        let auth = RedditAuthenticator::new(
            &credentials,
            &config.auth_base_url,
            api.http_client().clone(),
        )?;

        Ok(Self { api, auth })
    }

    /// Build a collector and prove the credentials work by authenticating
    /// once.
    pub async fn connect(config: &AppConfig) -> Result<Self, CoreError> {
        let collector = Self::new(config)?;
        collector.check_connection().await?;
        info!("Reddit collector ready");
        Ok(collector)
    }

    pub async fn check_connection(&self) -> Result<(), CoreError> {
        self.auth.access_token().await.map(|_| ())
    }

    pub fn api(&self) -> &RedditApiClient {
        &self.api
    }

    async fn collect(&self, topic: &str, limits: CorpusLimits) -> Result<Vec<Post>, CoreError> {
        let token = self.auth.access_token().await?;
        let results = self
            .api
            .search_posts(&token, topic, limits.post_limit)
            .await?;

        let mut posts = Vec::with_capacity(results.len().min(limits.post_limit));
        for data in results.into_iter().take(limits.post_limit) {
            let comments = self
                .api
                .get_comments(&token, &data.id, limits.comment_limit)
                .await?;

            let mut post = Post::from(data);
            post.comments = comments.into_iter().map(Comment::from).collect();
            posts.push(post);
        }

        Ok(posts)
    }
}

impl CorpusCollector for RedditCollector {
    async fn fetch_corpus(&self, topic: &str, limits: CorpusLimits) -> Result<Vec<Post>, CoreError> {
        let result = self.collect(topic, limits).await;

        if let Err(CoreError::RedditApi(RedditApiError::InvalidToken)) = &result {
            // Reddit revoked the token early. The next search starts fresh.
            self.auth.invalidate().await;
        }
        self.api.log_metrics().await;

        let posts = result?;
        debug!(
            posts = posts.len(),
            comments = posts.iter().map(|post| post.comments.len()).sum::<usize>(),
            "Corpus collected"
        );
        Ok(posts)
    }
}

use crate::aggregate::aggregate;
use mood_core::{CoreError, CorpusCollector, CorpusLimits, SearchOutcome, SentimentScorer};
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Request-scoped entry point for topic searches.
///
/// The collector and scorer are constructed once and reused for every
/// request; each call to [`SearchService::handle_search`] builds its own
/// accumulators.
pub struct SearchService<C, S> {
    collector: Option<C>,
    unavailable_reason: String,
    scorer: S,
    limits: CorpusLimits,
    search_timeout: Option<Duration>,
}

impl<C, S> SearchService<C, S>
where
    C: CorpusCollector,
    S: SentimentScorer,
{
    pub fn new(collector: C, scorer: S) -> Self {
        Self {
            collector: Some(collector),
            unavailable_reason: String::new(),
            scorer,
            limits: CorpusLimits::default(),
            search_timeout: None,
        }
    }

    /// A service whose collector could not be initialised. Every search
    /// fails with a configuration error.
    pub fn unavailable(reason: impl Into<String>, scorer: S) -> Self {
        Self {
            collector: None,
            unavailable_reason: reason.into(),
            scorer,
            limits: CorpusLimits::default(),
            search_timeout: None,
        }
    }

    pub fn with_limits(mut self, limits: CorpusLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Wall-clock budget for fetching a corpus. Expiry fails the search.
    pub fn with_search_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.search_timeout = timeout;
        self
    }

    pub fn is_available(&self) -> bool {
        self.collector.is_some()
    }

    pub fn limits(&self) -> CorpusLimits {
        self.limits
    }

    pub fn collector(&self) -> Option<&C> {
        self.collector.as_ref()
    }

    pub async fn handle_search(&self, topic: &str) -> Result<SearchOutcome, CoreError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("search", %request_id, topic);
        self.run_search(topic).instrument(span).await
    }

    async fn run_search(&self, topic: &str) -> Result<SearchOutcome, CoreError> {
        let Some(collector) = self.collector.as_ref() else {
            warn!("Search rejected, collector unavailable");
            return Err(CoreError::CollectorUnavailable {
                reason: self.unavailable_reason.clone(),
            });
        };

        let topic = validate_topic(topic)?;
        info!(
            post_limit = self.limits.post_limit,
            comment_limit = self.limits.comment_limit,
            "Searching"
        );

        let fetch = collector.fetch_corpus(topic, self.limits);
        let posts = match self.search_timeout {
            Some(budget) => tokio::time::timeout(budget, fetch)
                .await
                .map_err(|_| CoreError::Timeout {
                    seconds: whole_seconds(budget),
                })??,
            None => fetch.await?,
        };
        debug!("Fetched {} posts", posts.len());

        let outcome = aggregate(topic, &posts, self.limits, &self.scorer);
        match &outcome {
            SearchOutcome::Summary(summary) => info!(
                overall = %summary.overall_sentiment,
                compound = summary.compound_score,
                posts = summary.post_count,
                comments = summary.comment_count,
                "Search complete"
            ),
            SearchOutcome::NoResults { .. } => info!("No results"),
        }

        Ok(outcome)
    }
}

/// `budget` rounded up, so a sub-second budget never reads as zero.
fn whole_seconds(budget: Duration) -> u64 {
    budget.as_secs() + u64::from(budget.subsec_nanos() > 0)
}

/// Trimmed topic, or a validation error when nothing is left.
pub fn validate_topic(topic: &str) -> Result<&str, CoreError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(CoreError::InvalidInput {
            message: "Please enter a topic.".to_string(),
        });
    }
    Ok(topic)
}

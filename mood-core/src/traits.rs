//! Capabilities injected into the search path.
//!
//! Both are single-method seams so a different sentiment model or data
//! source can be swapped in without touching aggregation.

use crate::{CoreError, CorpusLimits, Post};

/// Scores a piece of text with a compound sentiment value in `[-1, 1]`.
///
/// Implementations must be pure and deterministic for identical input.
pub trait SentimentScorer {
    fn score(&self, text: &str) -> f64;
}

impl<F> SentimentScorer for F
where
    F: Fn(&str) -> f64,
{
    fn score(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Fetches the posts and comments matching a topic.
pub trait CorpusCollector {
    /// Returns at most `limits.post_limit` posts, each with at most
    /// `limits.comment_limit` flattened comments. Any failure fails the
    /// whole fetch.
    async fn fetch_corpus(&self, topic: &str, limits: CorpusLimits)
        -> Result<Vec<Post>, CoreError>;
}

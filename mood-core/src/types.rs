use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author recorded for comments whose account is gone.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// Compound scores at or above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores at or below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

pub const DEFAULT_POST_LIMIT: usize = 25;
pub const DEFAULT_COMMENT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
    pub url: String,
    pub subreddit: String,
    pub permalink: String,
    pub community_score: i64,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub body: String,
    pub author: String,
    pub community_score: i64,
}

impl Comment {
    pub fn new(body: impl Into<String>, author: Option<String>, community_score: i64) -> Self {
        Self {
            body: body.into(),
            author: author.unwrap_or_else(|| DELETED_AUTHOR.to_string()),
            community_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Classify a compound score. Both thresholds are inclusive toward the
    /// polar labels; the open interval between them is neutral.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextOrigin {
    PostTitle,
    PostBody,
    Comment,
}

/// A single piece of text to be scored, with its community weight.
#[derive(Debug, Clone, PartialEq)]
pub struct TextUnit<'a> {
    pub text: &'a str,
    pub weight: i64,
    pub origin: TextOrigin,
}

/// Weight of a post or comment: its community score plus one. Never clamped,
/// so scores of -1 and below yield zero or negative weights.
pub fn weight_for(community_score: i64) -> i64 {
    community_score + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusLimits {
    pub post_limit: usize,
    pub comment_limit: usize,
}

impl Default for CorpusLimits {
    fn default() -> Self {
        Self {
            post_limit: DEFAULT_POST_LIMIT,
            comment_limit: DEFAULT_COMMENT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedComment {
    pub body: String,
    pub author: String,
    pub community_score: i64,
    pub sentiment: SentimentLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedPost {
    pub title: String,
    pub url: String,
    pub subreddit: String,
    pub permalink: String,
    pub community_score: i64,
    /// Label of the title alone, not a roll-up of body and comments.
    pub sentiment: SentimentLabel,
    pub comments: Vec<AnnotatedComment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSummary {
    pub topic: String,
    pub overall_sentiment: SentimentLabel,
    /// Weighted average compound score, rounded to 2 decimals.
    pub compound_score: f64,
    pub positive_percent: f64,
    pub negative_percent: f64,
    pub neutral_percent: f64,
    pub post_count: usize,
    pub comment_count: usize,
    pub unit_count: usize,
    pub posts: Vec<AnnotatedPost>,
    pub generated_at: DateTime<Utc>,
}

/// Result of a search that did not fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    Summary(WeightedSummary),
    NoResults { topic: String },
}

impl SearchOutcome {
    pub fn summary(&self) -> Option<&WeightedSummary> {
        match self {
            SearchOutcome::Summary(summary) => Some(summary),
            SearchOutcome::NoResults { .. } => None,
        }
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, SearchOutcome::NoResults { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(SentimentLabel::from_compound(0.05), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_compound(-0.05), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_compound(0.0499), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_compound(-0.0499), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_compound(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_compound(1.0), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_compound(-1.0), SentimentLabel::Negative);
    }

    #[test]
    fn test_weight_is_not_clamped() {
        assert_eq!(weight_for(9), 10);
        assert_eq!(weight_for(0), 1);
        assert_eq!(weight_for(-1), 0);
        assert_eq!(weight_for(-5), -4);
    }

    #[test]
    fn test_missing_author_becomes_deleted() {
        let comment = Comment::new("hello", None, 3);
        assert_eq!(comment.author, DELETED_AUTHOR);

        let comment = Comment::new("hello", Some("someone".to_string()), 3);
        assert_eq!(comment.author, "someone");
    }

    #[test]
    fn test_no_results_outcome_serialization() {
        let outcome = SearchOutcome::NoResults {
            topic: "rust".to_string(),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"outcome\":\"no_results\""));
        assert!(outcome.summary().is_none());
        assert!(outcome.is_no_results());
    }
}

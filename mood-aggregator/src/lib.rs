//! Weighted sentiment aggregation over a searched corpus.

pub mod aggregate;
pub mod service;

pub use aggregate::{aggregate, post_units, round_to, score_of, ScoredUnit, SentimentTally};
pub use service::{validate_topic, SearchService};

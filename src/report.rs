//! Terminal rendering of search outcomes.

use mood_core::{AnnotatedPost, SearchOutcome, WeightedSummary};
use reddit_client::RateLimitStatus;

/// Comment bodies are cut to this many characters in text output.
pub const COMMENT_PREVIEW_CHARS: usize = 120;

pub fn render_text(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Summary(summary) => render_summary(summary),
        SearchOutcome::NoResults { topic } => format!("No results found for '{topic}'.\n"),
    }
}

pub fn render_json(outcome: &SearchOutcome) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(outcome)
}

fn render_summary(summary: &WeightedSummary) -> String {
    let mut out = format!(
        "Topic: {}\n\
         Overall sentiment: {} (compound {:.2})\n\
         Positive: {:.1}% | Negative: {:.1}% | Neutral: {:.1}%\n\
         Analyzed {} posts and {} comments\n",
        summary.topic,
        summary.overall_sentiment,
        summary.compound_score,
        summary.positive_percent,
        summary.negative_percent,
        summary.neutral_percent,
        summary.post_count,
        summary.comment_count
    );

    for post in &summary.posts {
        out.push('\n');
        out.push_str(&render_post(post));
    }

    out
}

fn render_post(post: &AnnotatedPost) -> String {
    let mut lines = vec![
        format!(
            "[{}] ({}) {}",
            post.sentiment,
            post.community_score,
            single_line(&post.title)
        ),
        format!("    {}", post.url),
    ];

    lines.extend(post.comments.iter().map(|comment| {
        format!(
            "    [{}] {} ({}): {}",
            comment.sentiment,
            comment.author,
            comment.community_score,
            preview(&comment.body, COMMENT_PREVIEW_CHARS)
        )
    }));

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

/// One-line summary of the client's rate limiter after a search.
pub fn render_rate_limit(status: &RateLimitStatus) -> String {
    format!(
        "Rate limit: {:.0}% of burst used, {} requests made, {} per minute allowed",
        status.utilization_percentage(),
        status.permits_granted,
        status.requests_per_minute
    )
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters of `text` on one line, with an ellipsis when
/// anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = single_line(text);
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

//! Weighted sentiment aggregation.
//!
//! Every post contributes a title unit, a body unit when the body is not
//! empty, and one unit per considered comment. Each unit carries the
//! community weight of its source (`score + 1`, unclamped). The overall
//! score is the weighted mean of unit compounds; the label breakdown counts
//! every unit once regardless of weight.

use chrono::Utc;
use mood_core::{
    weight_for, AnnotatedComment, AnnotatedPost, CorpusLimits, Post, SearchOutcome,
    SentimentLabel, SentimentScorer, TextOrigin, TextUnit, WeightedSummary,
};
use tracing::debug;

/// Compound score of a text. Empty text is 0 and never reaches the scorer.
pub fn score_of<S: SentimentScorer + ?Sized>(scorer: &S, text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    scorer.score(text).clamp(-1.0, 1.0)
}

/// Text units of one post in scoring order: title, body (if any), then the
/// first `comment_limit` comments.
pub fn post_units(post: &Post, comment_limit: usize) -> Vec<TextUnit<'_>> {
    let post_weight = weight_for(post.community_score);
    let mut units = Vec::with_capacity(2 + post.comments.len().min(comment_limit));

    units.push(TextUnit {
        text: &post.title,
        weight: post_weight,
        origin: TextOrigin::PostTitle,
    });
    if !post.body.is_empty() {
        units.push(TextUnit {
            text: &post.body,
            weight: post_weight,
            origin: TextOrigin::PostBody,
        });
    }
    units.extend(
        post.comments
            .iter()
            .take(comment_limit)
            .map(|comment| TextUnit {
                text: &comment.body,
                weight: weight_for(comment.community_score),
                origin: TextOrigin::Comment,
            }),
    );

    units
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredUnit {
    pub origin: TextOrigin,
    pub weight: i64,
    pub compound: f64,
    pub label: SentimentLabel,
}

impl ScoredUnit {
    pub fn new(origin: TextOrigin, weight: i64, compound: f64) -> Self {
        Self {
            origin,
            weight,
            compound,
            label: SentimentLabel::from_compound(compound),
        }
    }

    pub fn score<S: SentimentScorer + ?Sized>(unit: &TextUnit<'_>, scorer: &S) -> Self {
        Self::new(unit.origin, unit.weight, score_of(scorer, unit.text))
    }
}

/// Running totals over a population of scored units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SentimentTally {
    pub total_weight: i64,
    pub weighted_sum: f64,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentTally {
    pub fn from_units<'a>(units: impl IntoIterator<Item = &'a ScoredUnit>) -> Self {
        let mut tally = Self::default();
        for unit in units {
            tally.record(unit);
        }
        tally
    }

    pub fn record(&mut self, unit: &ScoredUnit) {
        self.total_weight += unit.weight;
        self.weighted_sum += unit.compound * unit.weight as f64;
        match unit.label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    pub fn unit_count(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Weighted mean compound. Zero when the weights sum to zero, which can
    /// happen with units present (all weight 0, or weights cancelling out).
    pub fn final_score(&self) -> f64 {
        if self.total_weight == 0 {
            0.0
        } else {
            self.weighted_sum / self.total_weight as f64
        }
    }

    pub fn overall_label(&self) -> SentimentLabel {
        SentimentLabel::from_compound(self.final_score())
    }

    /// Share of units with `label`, in percent rounded to 1 decimal.
    pub fn percent(&self, label: SentimentLabel) -> f64 {
        let units = self.unit_count();
        if units == 0 {
            return 0.0;
        }
        let count = match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        };
        round_to(100.0 * count as f64 / units as f64, 1)
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Fold a corpus into a weighted summary, or a no-results outcome when
/// there is nothing to score.
pub fn aggregate<S: SentimentScorer + ?Sized>(
    topic: &str,
    posts: &[Post],
    limits: CorpusLimits,
    scorer: &S,
) -> SearchOutcome {
    let mut tally = SentimentTally::default();
    let mut annotated = Vec::with_capacity(posts.len());
    let mut comment_count = 0;

    for post in posts {
        let scored: Vec<ScoredUnit> = post_units(post, limits.comment_limit)
            .iter()
            .map(|unit| ScoredUnit::score(unit, scorer))
            .collect();
        for unit in &scored {
            tally.record(unit);
        }

        let title_label = scored
            .iter()
            .find(|unit| unit.origin == TextOrigin::PostTitle)
            .map(|unit| unit.label)
            .unwrap_or(SentimentLabel::Neutral);
        let comment_labels = scored
            .iter()
            .filter(|unit| unit.origin == TextOrigin::Comment)
            .map(|unit| unit.label);

        let considered = post.comments.len().min(limits.comment_limit);
        comment_count += considered;

        let comments = post.comments[..considered]
            .iter()
            .zip(comment_labels)
            .map(|(comment, sentiment)| AnnotatedComment {
                body: comment.body.clone(),
                author: comment.author.clone(),
                community_score: comment.community_score,
                sentiment,
            })
            .collect();

        debug!(
            post_id = %post.id,
            units = scored.len(),
            title_sentiment = %title_label,
            "Scored post"
        );

        annotated.push(AnnotatedPost {
            title: post.title.clone(),
            url: post.url.clone(),
            subreddit: post.subreddit.clone(),
            permalink: post.permalink.clone(),
            community_score: post.community_score,
            sentiment: title_label,
            comments,
        });
    }

    if tally.unit_count() == 0 {
        return SearchOutcome::NoResults {
            topic: topic.to_string(),
        };
    }

    SearchOutcome::Summary(WeightedSummary {
        topic: topic.to_string(),
        overall_sentiment: tally.overall_label(),
        compound_score: round_to(tally.final_score(), 2),
        positive_percent: tally.percent(SentimentLabel::Positive),
        negative_percent: tally.percent(SentimentLabel::Negative),
        neutral_percent: tally.percent(SentimentLabel::Neutral),
        post_count: annotated.len(),
        comment_count,
        unit_count: tally.unit_count(),
        posts: annotated,
        generated_at: Utc::now(),
    })
}

//! Lexicon and rule based sentiment scoring.
//!
//! [`LexiconAnalyzer`] implements [`mood_core::SentimentScorer`], producing a
//! compound score in `[-1, 1]` for a piece of text.

pub mod analyzer;
pub mod lexicon;

pub use analyzer::{normalize, LexiconAnalyzer};
pub use lexicon::SentimentLexicon;

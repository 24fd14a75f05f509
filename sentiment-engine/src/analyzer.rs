//! Rule-based compound scorer.

use crate::lexicon::SentimentLexicon;
use mood_core::SentimentScorer;
use tracing::trace;

/// Added to a sentiment word written in caps inside mixed-case text.
pub const CAPS_INCREMENT: f64 = 0.733;
/// Multiplier applied to a word preceded by a negation.
pub const NEGATION_SCALAR: f64 = -0.74;
/// Normalization constant approximating the maximum expected sum.
pub const NORMALIZATION_ALPHA: f64 = 15.0;

const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCREMENT: f64 = 0.18;
const MAX_QUESTION_EMPHASIS: f64 = 0.96;
const LOOKBACK: usize = 3;

/// Normalize a raw valence sum into `[-1, 1]`.
pub fn normalize(score: f64) -> f64 {
    let normalized = score / (score * score + NORMALIZATION_ALPHA).sqrt();
    normalized.clamp(-1.0, 1.0)
}

#[derive(Debug, Clone)]
struct Token<'a> {
    raw: &'a str,
    lower: String,
}

impl Token<'_> {
    fn is_shouting(&self) -> bool {
        self.raw.chars().any(char::is_alphabetic)
            && self
                .raw
                .chars()
                .filter(|c| c.is_alphabetic())
                .all(char::is_uppercase)
    }
}

/// Lexicon-driven analyzer producing a compound score for a text.
#[derive(Debug, Clone, Default)]
pub struct LexiconAnalyzer {
    lexicon: SentimentLexicon,
}

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compound score of `text`, rounded to 4 decimals. Text with no
    /// sentiment-bearing words scores exactly 0.
    pub fn compound(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return 0.0;
        }

        let mixed_case = is_mixed_case(&tokens);
        let mut valences: Vec<f64> = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| self.token_valence(&tokens, i, token, mixed_case))
            .collect();

        apply_contrast(&tokens, &mut valences);

        let mut sum: f64 = valences.iter().sum();
        if sum == 0.0 {
            return 0.0;
        }
        sum += punctuation_emphasis(text).copysign(sum);

        let compound = round4(normalize(sum));
        trace!(tokens = tokens.len(), sum, compound, "Scored text");
        compound
    }

    fn token_valence(
        &self,
        tokens: &[Token<'_>],
        i: usize,
        token: &Token<'_>,
        mixed_case: bool,
    ) -> f64 {
        if self.lexicon.booster(&token.lower).is_some() {
            return 0.0;
        }
        let Some(mut valence) = self.lexicon.valence(&token.lower) else {
            return 0.0;
        };

        if mixed_case && token.is_shouting() {
            valence += CAPS_INCREMENT.copysign(valence);
        }

        for distance in 1..=LOOKBACK.min(i) {
            let previous = &tokens[i - distance];
            if let Some(increment) = self.lexicon.booster(&previous.lower) {
                // Boosters push away from zero, dampeners pull toward it.
                let mut scalar = increment * valence.signum();
                if mixed_case && previous.is_shouting() {
                    scalar += CAPS_INCREMENT.copysign(valence);
                }
                scalar *= match distance {
                    1 => 1.0,
                    2 => 0.95,
                    _ => 0.9,
                };
                valence += scalar;
            }
        }

        let negated = (1..=LOOKBACK.min(i)).any(|distance| {
            self.lexicon.is_negation(&tokens[i - distance].lower)
        });
        if negated {
            valence *= NEGATION_SCALAR;
        }

        valence
    }
}

impl SentimentScorer for LexiconAnalyzer {
    fn score(&self, text: &str) -> f64 {
        self.compound(text)
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .map(|word| word.trim_matches('\''))
        .filter(|word| !word.is_empty())
        .map(|raw| Token {
            raw,
            lower: raw.to_lowercase(),
        })
        .collect()
}

fn is_mixed_case(tokens: &[Token<'_>]) -> bool {
    let shouting = tokens.iter().filter(|token| token.is_shouting()).count();
    shouting > 0 && shouting < tokens.len()
}

/// Words before a contrastive "but" count half, words after count 1.5x.
fn apply_contrast(tokens: &[Token<'_>], valences: &mut [f64]) {
    let Some(pivot) = tokens.iter().position(|token| token.lower == "but") else {
        return;
    };

    for (i, valence) in valences.iter_mut().enumerate() {
        if i < pivot {
            *valence *= 0.5;
        } else if i > pivot {
            *valence *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();

    let question_emphasis = if questions > 3 {
        MAX_QUESTION_EMPHASIS
    } else if questions > 1 {
        questions as f64 * QUESTION_INCREMENT
    } else {
        0.0
    };

    exclamations as f64 * EXCLAMATION_INCREMENT + question_emphasis
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

//! Word valences and modifier lists.
//!
//! Valences use the `[-4, 4]` rating scale of human-annotated sentiment
//! lexicons; the analyzer normalizes sums into a compound score.

use std::collections::{HashMap, HashSet};

/// Boost applied by an intensifying word.
pub const BOOSTER_INCREMENT: f64 = 0.293;
/// Boost applied by a dampening word.
pub const BOOSTER_DECREMENT: f64 = -0.293;

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("acceptable", 1.3),
    ("admire", 2.1),
    ("adorable", 2.2),
    ("agree", 1.5),
    ("amazing", 2.8),
    ("amazed", 2.2),
    ("appreciate", 1.7),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("bless", 1.9),
    ("brilliant", 2.8),
    ("calm", 1.3),
    ("celebrate", 2.7),
    ("cheerful", 2.5),
    ("clean", 1.7),
    ("comfortable", 1.5),
    ("cool", 1.3),
    ("cute", 2.0),
    ("delight", 2.9),
    ("delightful", 2.8),
    ("easy", 1.9),
    ("efficient", 1.8),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("excellent", 2.7),
    ("excited", 1.4),
    ("exciting", 2.2),
    ("fair", 1.3),
    ("fan", 1.3),
    ("fantastic", 2.6),
    ("fast", 1.0),
    ("favorite", 2.0),
    ("fine", 0.8),
    ("fixed", 1.1),
    ("free", 2.3),
    ("fresh", 1.3),
    ("friendly", 2.2),
    ("fun", 2.3),
    ("funny", 1.9),
    ("glad", 2.0),
    ("good", 1.9),
    ("gorgeous", 3.0),
    ("grateful", 2.0),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.9),
    ("hope", 1.9),
    ("hopeful", 1.6),
    ("impressive", 2.3),
    ("improved", 2.1),
    ("incredible", 2.5),
    ("interesting", 1.7),
    ("joy", 2.8),
    ("kind", 2.4),
    ("laugh", 2.6),
    ("like", 1.5),
    ("liked", 1.8),
    ("lol", 1.8),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("luck", 2.0),
    ("lucky", 1.8),
    ("masterpiece", 3.1),
    ("nice", 1.8),
    ("ok", 1.2),
    ("okay", 0.9),
    ("outstanding", 3.0),
    ("perfect", 2.7),
    ("pleasant", 2.3),
    ("pleased", 1.9),
    ("popular", 1.8),
    ("positive", 2.6),
    ("powerful", 1.8),
    ("pretty", 2.2),
    ("proud", 2.1),
    ("recommend", 1.5),
    ("reliable", 1.9),
    ("safe", 1.9),
    ("satisfied", 1.8),
    ("smart", 1.7),
    ("smooth", 1.1),
    ("solid", 1.2),
    ("solved", 1.4),
    ("strong", 2.3),
    ("success", 2.7),
    ("successful", 2.8),
    ("support", 1.7),
    ("sweet", 2.0),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("top", 0.8),
    ("trust", 2.3),
    ("useful", 1.9),
    ("valuable", 2.1),
    ("win", 2.8),
    ("winning", 2.4),
    ("wonderful", 2.7),
    ("worth", 0.9),
    ("wow", 2.8),
    ("yay", 2.4),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("abuse", -3.2),
    ("afraid", -2.2),
    ("angry", -2.3),
    ("annoying", -2.1),
    ("anxious", -1.0),
    ("awful", -2.0),
    ("bad", -2.5),
    ("boring", -1.3),
    ("broke", -1.8),
    ("broken", -2.1),
    ("bug", -0.5),
    ("buggy", -1.5),
    ("cheat", -2.0),
    ("concern", -0.6),
    ("confused", -1.3),
    ("crap", -1.6),
    ("crash", -1.7),
    ("crisis", -3.1),
    ("cry", -2.1),
    ("damn", -1.7),
    ("dead", -3.3),
    ("death", -2.9),
    ("decline", -1.1),
    ("depressed", -2.3),
    ("destroy", -2.5),
    ("difficult", -1.5),
    ("disappointed", -2.3),
    ("disappointing", -2.2),
    ("disaster", -3.1),
    ("dislike", -1.6),
    ("dumb", -2.3),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("fake", -2.1),
    ("fear", -2.2),
    ("fraud", -2.8),
    ("frustrated", -2.4),
    ("frustrating", -1.9),
    ("garbage", -2.4),
    ("hard", -0.4),
    ("hate", -2.7),
    ("hated", -3.2),
    ("horrible", -2.5),
    ("hurt", -2.4),
    ("idiot", -2.3),
    ("ill", -1.8),
    ("kill", -3.7),
    ("lame", -1.8),
    ("lie", -1.6),
    ("lose", -1.7),
    ("loss", -1.3),
    ("lost", -1.3),
    ("mad", -2.2),
    ("mess", -1.5),
    ("miss", -0.6),
    ("negative", -2.7),
    ("nightmare", -2.7),
    ("pain", -2.3),
    ("pathetic", -2.6),
    ("poor", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("sad", -2.1),
    ("scam", -2.5),
    ("scary", -2.2),
    ("shame", -2.1),
    ("sick", -2.3),
    ("slow", -0.9),
    ("sorry", -0.3),
    ("stupid", -2.4),
    ("suck", -1.5),
    ("sucks", -1.5),
    ("terrible", -2.1),
    ("threat", -2.4),
    ("toxic", -2.6),
    ("trash", -1.6),
    ("trouble", -1.7),
    ("ugly", -2.3),
    ("unfair", -2.1),
    ("unhappy", -1.8),
    ("upset", -1.6),
    ("useless", -1.8),
    ("war", -2.9),
    ("waste", -1.8),
    ("weak", -1.9),
    ("worried", -1.2),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

const INTENSIFIERS: &[&str] = &[
    "absolutely",
    "amazingly",
    "completely",
    "considerably",
    "deeply",
    "enormously",
    "entirely",
    "especially",
    "exceptionally",
    "extremely",
    "fully",
    "greatly",
    "highly",
    "hugely",
    "incredibly",
    "insanely",
    "most",
    "more",
    "particularly",
    "purely",
    "quite",
    "really",
    "remarkably",
    "so",
    "substantially",
    "super",
    "thoroughly",
    "totally",
    "tremendously",
    "truly",
    "utterly",
    "very",
];

const DAMPENERS: &[&str] = &[
    "almost",
    "barely",
    "hardly",
    "kinda",
    "less",
    "little",
    "marginally",
    "occasionally",
    "partly",
    "scarcely",
    "slightly",
    "somewhat",
    "sorta",
];

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "never", "no", "nobody", "none",
    "nope", "nor", "not", "nothing", "nowhere", "shouldnt", "wasnt", "werent", "without",
    "wont", "wouldnt",
];

/// Word valences plus the modifier vocabularies the analyzer consults.
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    valences: HashMap<String, f64>,
    boosters: HashMap<String, f64>,
    negations: HashSet<String>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        let mut lexicon = Self::empty();

        for (word, valence) in POSITIVE_WORDS.iter().chain(NEGATIVE_WORDS) {
            lexicon.add_word(word, *valence);
        }
        for word in INTENSIFIERS {
            lexicon.add_booster(word, BOOSTER_INCREMENT);
        }
        for word in DAMPENERS {
            lexicon.add_booster(word, BOOSTER_DECREMENT);
        }
        for word in NEGATIONS {
            lexicon.negations.insert(word.to_string());
        }

        lexicon
    }
}

impl SentimentLexicon {
    pub fn empty() -> Self {
        Self {
            valences: HashMap::new(),
            boosters: HashMap::new(),
            negations: HashSet::new(),
        }
    }

    /// Add or replace a word valence, clamped to `[-4, 4]`.
    pub fn add_word(&mut self, word: &str, valence: f64) {
        self.valences
            .insert(word.to_lowercase(), valence.clamp(-4.0, 4.0));
    }

    pub fn add_booster(&mut self, word: &str, increment: f64) {
        self.boosters.insert(word.to_lowercase(), increment);
    }

    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    pub fn booster(&self, word: &str) -> Option<f64> {
        self.boosters.get(word).copied()
    }

    /// Negation words, including any contraction ending in "n't".
    pub fn is_negation(&self, word: &str) -> bool {
        word.ends_with("n't") || self.negations.contains(&word.replace('\'', ""))
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

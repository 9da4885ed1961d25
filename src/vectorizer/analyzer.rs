//! Text analysis: lowercase, split into word tokens, drop stop-words.

use std::sync::OnceLock;

use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::vectorizer::{stop_words::ENGLISH_STOP_WORDS, token::TokenFrequency};

/// Named stop-word lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopWordsPreset {
    English,
    None,
}

/// Which stop-words to remove.
///
/// In config files this is a preset name (`english`, `none`), a list of
/// words, or the same list as `{custom: [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopWords {
    Preset(StopWordsPreset),
    Custom(Vec<String>),
    Tagged { custom: Vec<String> },
}

impl Default for StopWords {
    fn default() -> Self {
        StopWords::Preset(StopWordsPreset::English)
    }
}

impl StopWords {
    pub fn english() -> Self {
        StopWords::Preset(StopWordsPreset::English)
    }

    pub fn none() -> Self {
        StopWords::Preset(StopWordsPreset::None)
    }

    /// Resolved, lowercased word set.
    fn resolve(&self) -> IndexSet<Box<str>> {
        match self {
            StopWords::Preset(StopWordsPreset::English) => {
                ENGLISH_STOP_WORDS.iter().map(|w| Box::from(*w)).collect()
            }
            StopWords::Preset(StopWordsPreset::None) => IndexSet::new(),
            StopWords::Custom(words) | StopWords::Tagged { custom: words } => words
                .iter()
                .map(|w| w.trim().to_lowercase().into_boxed_str())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }
}

/// word tokens: runs of two or more word characters
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

/// Tokenizer state stored with a fitted model, so queries are analyzed
/// exactly like the corpus was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analyzer {
    stop_words: IndexSet<Box<str>>,
}

impl Analyzer {
    pub fn new(stop_words: &StopWords) -> Self {
        Self {
            stop_words: stop_words.resolve(),
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Tokens of `text` in order of appearance, stop-words removed.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        token_pattern()
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|tok| !self.is_stop_word(tok))
            .map(str::to_string)
            .collect()
    }

    /// Token counts of `text`.
    pub fn analyze(&self, text: &str) -> TokenFrequency {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(&self.tokenize(text));
        freq
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(&StopWords::default())
    }
}

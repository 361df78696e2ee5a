//! Keyword extraction and matching.
//!
//! Text is reduced to a set of normalized tokens: lowercased, split on
//! anything that is not a word character, with short tokens and stopwords
//! dropped. Matching is exact token equality (no stemming, no plural folding).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Stopwords that are always removed.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "and", "a", "an", "in", "to", "for", "of", "is", "are", "that", "this",
];

/// A deduplicated set of normalized tokens.
///
/// Membership is order-independent, but iteration follows first insertion so
/// that "first N" selections are stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct KeywordSet {
    tokens: Vec<String>,
    index: HashSet<String>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token. Returns `false` if it was already present.
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if self.index.contains(&token) {
            return false;
        }
        self.index.insert(token.clone());
        self.tokens.push(token);
        true
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// The first `n` tokens in insertion order.
    pub fn first(&self, n: usize) -> Vec<String> {
        self.tokens.iter().take(n).cloned().collect()
    }

    pub fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in tokens {
            self.insert(token);
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }
}

impl PartialEq for KeywordSet {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for KeywordSet {}

impl From<Vec<String>> for KeywordSet {
    fn from(tokens: Vec<String>) -> Self {
        let mut set = KeywordSet::new();
        set.extend(tokens);
        set
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.tokens
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        set.extend(iter);
        set
    }
}

/// Turns free text into a `KeywordSet`.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stopwords: HashSet<String>,
    min_token_length: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            min_token_length: 4,
        }
    }
}

impl KeywordExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add stopwords on top of the built-in list.
    pub fn with_extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    /// Set the shortest token that is kept (in characters).
    pub fn with_min_token_length(mut self, min: usize) -> Self {
        self.min_token_length = min;
        self
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Extract the keyword set of `text`. Empty text yields an empty set.
    pub fn extract(&self, text: &str) -> KeywordSet {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| if is_word_char(c) { c } else { ' ' })
            .collect();

        normalized
            .split_whitespace()
            .filter(|token| token.chars().count() >= self.min_token_length)
            .filter(|token| !self.stopwords.contains(*token))
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Outcome of comparing a response against the expected vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    /// Expected keywords found in the response, in expected order.
    pub matched: Vec<String>,
    /// Expected keywords absent from the response, in expected order.
    pub missing: Vec<String>,
    /// `|matched| / |expected|`, or 0 when nothing is expected.
    pub match_score: f64,
}

/// Compare the expected set `expected` against the response set `response`.
pub fn match_keywords(expected: &KeywordSet, response: &KeywordSet) -> KeywordMatch {
    let (matched, missing): (Vec<String>, Vec<String>) = expected
        .iter()
        .map(str::to_string)
        .partition(|token| response.contains(token));

    let match_score = if expected.is_empty() {
        0.0
    } else {
        matched.len() as f64 / expected.len() as f64
    };

    KeywordMatch {
        matched,
        missing,
        match_score,
    }
}

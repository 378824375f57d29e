// Tokenizer and linguistic-analysis traits.
//
// Both methodologies implement `Tokenize` so the vectorizers never care
// which one produced a stream. The linguistic tokenizer depends on an
// external analyzer only through `Analyzer`, which lets tests swap in a
// fixed-lexicon fake.

use serde::Serialize;

/// Ordered sequence of normalized tokens for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenStream {
    tokens: Vec<String>,
}

impl TokenStream {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
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

    /// The first `n` tokens joined by spaces.
    pub fn preview(&self, n: usize) -> String {
        self.tokens
            .iter()
            .take(n)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// All tokens joined by spaces.
    pub fn joined(&self) -> String {
        self.tokens.join(" ")
    }
}

impl From<Vec<String>> for TokenStream {
    fn from(tokens: Vec<String>) -> Self {
        Self::new(tokens)
    }
}

/// The two competing tokenization approaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Methodology {
    /// Lowercase, strip punctuation, split on whitespace
    RuleBased,
    /// Lemmatized, stopword- and punctuation-filtered
    Linguistic,
}

impl Methodology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Methodology::RuleBased => "rule_based",
            Methodology::Linguistic => "linguistic",
        }
    }
}

/// Turns raw text into a token stream.
pub trait Tokenize {
    fn methodology(&self) -> Methodology;

    fn tokenize(&self, text: &str) -> TokenStream;
}

/// One unit produced by a linguistic analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedToken {
    pub surface: String,
    pub lemma: String,
    pub is_stopword: bool,
    pub is_punctuation: bool,
    pub is_alphabetic: bool,
}

/// External linguistic-analysis capability (segmentation, lemmas, flags).
pub trait Analyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Vec<AnalyzedToken>;
}

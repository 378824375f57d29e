// Linguistic tokenizer: a thin adapter over an `Analyzer`.
//
// Every analyzed unit is dropped if it is a stopword, punctuation, or not
// alphabetic. Survivors contribute their lemma, trimmed and lowercased.

use super::traits::{Analyzer, Methodology, TokenStream, Tokenize};

pub struct LinguisticTokenizer {
    analyzer: Box<dyn Analyzer>,
}

impl LinguisticTokenizer {
    pub fn new(analyzer: Box<dyn Analyzer>) -> Self {
        Self { analyzer }
    }
}

impl Tokenize for LinguisticTokenizer {
    fn methodology(&self) -> Methodology {
        Methodology::Linguistic
    }

    fn tokenize(&self, text: &str) -> TokenStream {
        self.analyzer
            .analyze(text)
            .into_iter()
            .filter(|unit| !unit.is_stopword && !unit.is_punctuation && unit.is_alphabetic)
            .map(|unit| unit.lemma.trim().to_lowercase())
            .filter(|lemma| !lemma.is_empty())
            .collect::<Vec<_>>()
            .into()
    }
}

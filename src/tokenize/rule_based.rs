// Rule-based tokenizer: no model, no external state.
//
// Lowercase, delete every punctuation character (ASCII punctuation plus a
// corpus-specific set of typographic quotes and dashes), split on
// whitespace, then drop tokens made only of decimal digits. No stemming and no
// stopword removal: this is the baseline the linguistic tokenizer is
// compared against.

use std::collections::HashSet;

use super::traits::{Methodology, TokenStream, Tokenize};

/// Typographic marks common in Catalan news prose that ASCII punctuation misses.
pub const DEFAULT_EXTRA_PUNCTUATION: &str = "“”«»…–—·’";

#[derive(Debug, Clone)]
pub struct RuleTokenizer {
    extra_punctuation: HashSet<char>,
}

impl Default for RuleTokenizer {
    fn default() -> Self {
        Self::with_extra_punctuation(DEFAULT_EXTRA_PUNCTUATION)
    }
}

impl RuleTokenizer {
    /// Build a tokenizer that also strips every character in `extra`.
    pub fn with_extra_punctuation(extra: &str) -> Self {
        Self {
            extra_punctuation: extra.chars().collect(),
        }
    }

    fn is_stripped(&self, c: char) -> bool {
        c.is_ascii_punctuation() || self.extra_punctuation.contains(&c)
    }
}

/// Decimal digits, including their superscript forms. Fractions and roman
/// numerals are numeric but not digits, so tokens like `½` survive.
fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '¹' | '²' | '³' | '⁰' | '⁴'..='⁹')
}

impl Tokenize for RuleTokenizer {
    fn methodology(&self) -> Methodology {
        Methodology::RuleBased
    }

    fn tokenize(&self, text: &str) -> TokenStream {
        let stripped: String = text
            .to_lowercase()
            .chars()
            .filter(|&c| !self.is_stripped(c))
            .collect();

        stripped
            .split_whitespace()
            .filter(|token| !token.chars().all(is_digit))
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into()
    }
}

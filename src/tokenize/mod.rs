// Tokenization: two competing methodologies behind one trait.
//
// RuleTokenizer needs nothing but the text. LinguisticTokenizer wraps an
// Analyzer capability; LexiconAnalyzer is the one the CLI loads.

pub mod lexicon;
pub mod linguistic;
pub mod rule_based;
pub mod traits;

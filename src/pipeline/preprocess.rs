// Preprocessing: run both tokenizers over the corpus for side-by-side review.
//
// Produces one token table per methodology. The linguistic analyzer is
// loaded before any document is tokenized, so a missing resource fails the
// step up front rather than halfway through.

use serde::Serialize;
use tracing::info;

use super::capabilities::CapabilityLoader;
use crate::corpus::Corpus;
use crate::error::PipelineError;
use crate::tokenize::linguistic::LinguisticTokenizer;
use crate::tokenize::rule_based::RuleTokenizer;
use crate::tokenize::traits::{Methodology, Tokenize};

/// Number of leading tokens shown in the sample column.
pub const SAMPLE_TOKENS: usize = 20;

/// One document's tokenization under one methodology.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenTableRow {
    pub id: String,
    pub title: String,
    pub body: String,
    pub text_len_chars: usize,
    pub n_tokens: usize,
    pub sample_tokens: String,
    pub tokens: String,
}

/// Token tables for every methodology, in the same document order.
#[derive(Debug, Clone)]
pub struct TokenTables {
    pub rule_based: Vec<TokenTableRow>,
    pub linguistic: Vec<TokenTableRow>,
}

impl TokenTables {
    pub fn table(&self, methodology: Methodology) -> &[TokenTableRow] {
        match methodology {
            Methodology::RuleBased => &self.rule_based,
            Methodology::Linguistic => &self.linguistic,
        }
    }
}

/// Tokenize the corpus with one tokenizer.
pub fn token_table(corpus: &Corpus, tokenizer: &dyn Tokenize) -> Vec<TokenTableRow> {
    corpus
        .documents()
        .iter()
        .map(|doc| {
            let text = doc.full_text();
            let stream = tokenizer.tokenize(&text);
            TokenTableRow {
                id: doc.id.clone(),
                title: doc.title.clone(),
                body: doc.body.clone(),
                text_len_chars: text.chars().count(),
                n_tokens: stream.len(),
                sample_tokens: stream.preview(SAMPLE_TOKENS),
                tokens: stream.joined(),
            }
        })
        .collect()
}

/// Build both token tables.
pub fn run(
    corpus: &Corpus,
    rule_tokenizer: &RuleTokenizer,
    capabilities: &dyn CapabilityLoader,
) -> Result<TokenTables, PipelineError> {
    let linguistic_tokenizer = LinguisticTokenizer::new(capabilities.load_analyzer()?);

    let rule_based = token_table(corpus, rule_tokenizer);
    let linguistic = token_table(corpus, &linguistic_tokenizer);

    info!(
        documents = corpus.len(),
        rule_based_tokens = rule_based.iter().map(|r| r.n_tokens).sum::<usize>(),
        linguistic_tokens = linguistic.iter().map(|r| r.n_tokens).sum::<usize>(),
        "Preprocessing complete"
    );

    Ok(TokenTables {
        rule_based,
        linguistic,
    })
}

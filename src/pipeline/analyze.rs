// Analysis pipeline: three independent views of one corpus.
//
//   1. Bag of words: rule-based tokens -> counts -> top terms
//   2. TF-IDF: linguistic tokens -> weights -> top terms
//   3. Embeddings: joined title + body text -> pairwise cosine ranking
//
// No branch consumes another's output. By default a failing branch is
// logged and the others still run; with `fail_fast` the first failure
// aborts the run.

use serde::Serialize;
use tracing::{info, warn};

use super::capabilities::CapabilityLoader;
use crate::corpus::Corpus;
use crate::embeddings::similarity::{similarity_ranking, SimilarityPair};
use crate::error::PipelineError;
use crate::tokenize::linguistic::LinguisticTokenizer;
use crate::tokenize::rule_based::RuleTokenizer;
use crate::tokenize::traits::{TokenStream, Tokenize};
use crate::vectorize::count::CountModel;
use crate::vectorize::tfidf::TfIdfModel;
use crate::vectorize::top_terms::TopTermList;

/// Default number of terms kept per document.
pub const DEFAULT_TOP_N: usize = 12;

/// The three analysis branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    BagOfWords,
    TfIdf,
    Embeddings,
}

impl Branch {
    pub fn label(&self) -> &'static str {
        match self {
            Branch::BagOfWords => "Bag of words",
            Branch::TfIdf => "TF-IDF",
            Branch::Embeddings => "Embedding similarity",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Terms kept per document in both top-term tables
    pub top_n: usize,
    /// Abort on the first branch failure instead of reporting partial results
    pub fail_fast: bool,
    /// Tokenizer for the bag-of-words branch
    pub rule_tokenizer: RuleTokenizer,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            fail_fast: false,
            rule_tokenizer: RuleTokenizer::default(),
        }
    }
}

/// Top terms of one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTermRow {
    pub document: String,
    pub terms: TopTermList,
}

/// Output of one analysis run. Each branch succeeds or fails on its own.
#[derive(Debug)]
pub struct AnalysisResults {
    pub documents: usize,
    pub bag_of_words: Result<Vec<TopTermRow>, PipelineError>,
    pub tfidf: Result<Vec<TopTermRow>, PipelineError>,
    pub similarity: Result<Vec<SimilarityPair>, PipelineError>,
}

impl AnalysisResults {
    /// Branches that failed, in pipeline order.
    pub fn failures(&self) -> Vec<(Branch, &PipelineError)> {
        let mut failures = Vec::new();
        if let Err(e) = &self.bag_of_words {
            failures.push((Branch::BagOfWords, e));
        }
        if let Err(e) = &self.tfidf {
            failures.push((Branch::TfIdf, e));
        }
        if let Err(e) = &self.similarity {
            failures.push((Branch::Embeddings, e));
        }
        failures
    }

    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }
}

/// Tokenize every document's joined text, in corpus order.
pub fn tokenize_corpus(corpus: &Corpus, tokenizer: &dyn Tokenize) -> Vec<TokenStream> {
    corpus
        .documents()
        .iter()
        .map(|doc| tokenizer.tokenize(&doc.full_text()))
        .collect()
}

/// Bag-of-words branch: raw counts over rule-based tokens.
pub fn bag_of_words(corpus: &Corpus, tokenizer: &dyn Tokenize, top_n: usize) -> Vec<TopTermRow> {
    let streams = tokenize_corpus(corpus, tokenizer);
    let model = CountModel::fit(&streams);
    rows_from(corpus, |doc| model.top_terms(doc, top_n))
}

/// TF-IDF branch: smoothed, L2-normalized weights over linguistic tokens.
pub fn tfidf(corpus: &Corpus, tokenizer: &dyn Tokenize, top_n: usize) -> Vec<TopTermRow> {
    let streams = tokenize_corpus(corpus, tokenizer);
    let model = TfIdfModel::fit(&streams);
    rows_from(corpus, |doc| model.top_terms(doc, top_n))
}

fn rows_from(corpus: &Corpus, top: impl Fn(usize) -> TopTermList) -> Vec<TopTermRow> {
    corpus
        .documents()
        .iter()
        .enumerate()
        .map(|(i, doc)| TopTermRow {
            document: doc.id.clone(),
            terms: top(i),
        })
        .collect()
}

/// Run all three branches over the corpus.
///
/// Capabilities are loaded at the start of the branch that needs them, so
/// an unavailable model stops that branch before any document is touched.
pub async fn run(
    corpus: &Corpus,
    capabilities: &dyn CapabilityLoader,
    options: &AnalysisOptions,
) -> Result<AnalysisResults, PipelineError> {
    info!(documents = corpus.len(), top_n = options.top_n, "Starting analysis");

    let bow_rows = bag_of_words(corpus, &options.rule_tokenizer, options.top_n);
    info!(branch = Branch::BagOfWords.label(), "Branch complete");

    let tfidf_rows = settle(
        Branch::TfIdf,
        capabilities.load_analyzer().map(|analyzer| {
            let tokenizer = LinguisticTokenizer::new(analyzer);
            tfidf(corpus, &tokenizer, options.top_n)
        }),
        options.fail_fast,
    )?;

    let similarity = match capabilities.load_embedder() {
        Ok(embedder) => {
            let texts: Vec<String> = corpus.documents().iter().map(|d| d.full_text()).collect();
            similarity_ranking(corpus.documents(), &texts, embedder.as_ref()).await
        }
        Err(e) => Err(e),
    };
    let similarity = settle(Branch::Embeddings, similarity, options.fail_fast)?;

    Ok(AnalysisResults {
        documents: corpus.len(),
        bag_of_words: Ok(bow_rows),
        tfidf: tfidf_rows,
        similarity,
    })
}

/// Log a branch outcome. Under fail-fast an error propagates; otherwise it
/// is kept as the branch's result.
fn settle<T>(
    branch: Branch,
    outcome: Result<T, PipelineError>,
    fail_fast: bool,
) -> Result<Result<T, PipelineError>, PipelineError> {
    match outcome {
        Ok(value) => {
            info!(branch = branch.label(), "Branch complete");
            Ok(Ok(value))
        }
        Err(e) if fail_fast => Err(e),
        Err(e) => {
            warn!(branch = branch.label(), error = %e, "Branch failed, continuing");
            Ok(Err(e))
        }
    }
}

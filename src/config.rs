use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::corpus::loader::ColumnNames;
use crate::embeddings::download::{default_model_dir, embedding_files_present};
use crate::embeddings::onnx::{model_by_name, EmbeddingModel, KNOWN_MODELS, MULTILINGUAL_MINILM};
use crate::pipeline::analyze::DEFAULT_TOP_N;
use crate::pipeline::capabilities::LocalModels;
use crate::tokenize::lexicon::LexiconOptions;
use crate::tokenize::rule_based::{RuleTokenizer, DEFAULT_EXTRA_PUNCTUATION};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy. CLI flags override
/// individual fields after loading.
#[derive(Debug, Clone)]
pub struct Config {
    /// Corpus CSV read by `preprocess` and `analyze`, written by `extract`
    pub corpus_path: PathBuf,
    /// Directory of raw HTML articles for `extract`
    pub raw_dir: PathBuf,
    /// Directory receiving every output table
    pub out_dir: PathBuf,
    pub top_n: usize,
    /// Base directory for embedding models
    pub model_dir: PathBuf,
    pub embedding_model_name: String,
    /// Stopword language code (ISO 639-1)
    pub language: String,
    /// Optional `form<TAB>lemma` dictionary
    pub lemma_dict: Option<PathBuf>,
    /// Optional extra stopwords, one per line
    pub stopwords_file: Option<PathBuf>,
    /// Typographic punctuation stripped by the rule-based tokenizer
    pub extra_punctuation: String,
    /// Corpus CSV column headers
    pub columns: ColumnNames,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only TOPICMAP_TOP_N can fail to parse.
    pub fn load() -> Result<Self> {
        let top_n = match env::var("TOPICMAP_TOP_N") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("TOPICMAP_TOP_N must be a non-negative integer, got `{raw}`"))?,
            Err(_) => DEFAULT_TOP_N,
        };

        Ok(Self {
            corpus_path: path_var("TOPICMAP_CORPUS")
                .unwrap_or_else(|| PathBuf::from("data/processed/articles.csv")),
            raw_dir: path_var("TOPICMAP_RAW_DIR").unwrap_or_else(|| PathBuf::from("data/raw")),
            out_dir: path_var("TOPICMAP_OUT_DIR")
                .unwrap_or_else(|| PathBuf::from("data/processed")),
            top_n,
            model_dir: path_var("TOPICMAP_MODEL_DIR").unwrap_or_else(default_model_dir),
            embedding_model_name: env::var("TOPICMAP_EMBEDDING_MODEL")
                .unwrap_or_else(|_| MULTILINGUAL_MINILM.name.to_string()),
            language: env::var("TOPICMAP_LANGUAGE").unwrap_or_else(|_| "ca".to_string()),
            lemma_dict: path_var("TOPICMAP_LEMMA_DICT"),
            stopwords_file: path_var("TOPICMAP_STOPWORDS_FILE"),
            extra_punctuation: env::var("TOPICMAP_EXTRA_PUNCT")
                .unwrap_or_else(|_| DEFAULT_EXTRA_PUNCTUATION.to_string()),
            columns: column_names_from_env(),
        })
    }

    /// Resolve the configured embedding model name.
    pub fn embedding_model(&self) -> Result<EmbeddingModel> {
        model_by_name(&self.embedding_model_name).ok_or_else(|| {
            let known: Vec<&str> = KNOWN_MODELS.iter().map(|m| m.name).collect();
            anyhow::anyhow!(
                "Unknown embedding model `{}`. Set TOPICMAP_EMBEDDING_MODEL to one of: {}",
                self.embedding_model_name,
                known.join(", ")
            )
        })
    }

    /// Whether the configured embedding model is on disk.
    pub fn embedding_files_present(&self) -> Result<bool> {
        Ok(embedding_files_present(&self.model_dir, &self.embedding_model()?))
    }

    pub fn lexicon_options(&self) -> LexiconOptions {
        LexiconOptions {
            language: self.language.clone(),
            lemma_dict: self.lemma_dict.clone(),
            extra_stopwords: self.stopwords_file.clone(),
        }
    }

    pub fn rule_tokenizer(&self) -> RuleTokenizer {
        RuleTokenizer::with_extra_punctuation(&self.extra_punctuation)
    }

    /// Capability loader for the linguistic analyzer and the embedder.
    ///
    /// The model name is resolved when the embedding branch starts, so an
    /// unknown name fails that branch alone.
    pub fn local_models(&self) -> LocalModels {
        LocalModels {
            lexicon: self.lexicon_options(),
            embedding_model_name: self.embedding_model_name.clone(),
            model_dir: self.model_dir.clone(),
        }
    }

    pub fn column_names(&self) -> ColumnNames {
        self.columns.clone()
    }
}

/// Column headers from TOPICMAP_{ID,TITLE,BODY}_COLUMN, each falling back
/// to its default when unset or blank.
fn column_names_from_env() -> ColumnNames {
    let defaults = ColumnNames::default();
    let column = |name: &str, default: String| {
        env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    };
    ColumnNames {
        id: column("TOPICMAP_ID_COLUMN", defaults.id),
        title: column("TOPICMAP_TITLE_COLUMN", defaults.title),
        body: column("TOPICMAP_BODY_COLUMN", defaults.body),
    }
}

/// A non-empty environment variable as a path.
fn path_var(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

// topicmap: topic identification over a corpus of news articles
//
// This is the library root. The binary in main.rs wires configuration and
// the CLI onto these subsystems:
//
//   corpus      documents, CSV loading, HTML extraction
//   tokenize    rule-based and linguistic tokenizers
//   vectorize   term counts, TF-IDF, top-term ranking
//   embeddings  sentence embeddings and pairwise similarity
//   pipeline    preprocessing and the three-branch analysis
//   output      CSV tables, run summary, terminal display

pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod tokenize;
pub mod vectorize;

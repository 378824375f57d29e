// Pipelines: sequence the tokenizers, vectorizers and similarity engine.
//
// preprocess: corpus -> token tables for both methodologies
// analyze:    corpus -> bag-of-words, TF-IDF and similarity tables

pub mod analyze;
pub mod capabilities;
pub mod preprocess;

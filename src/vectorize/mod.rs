// Vectorization: vocabulary, raw counts, TF-IDF weights and top terms.
//
// All of it is pure arithmetic over token streams; nothing here can fail.

pub mod count;
pub mod tfidf;
pub mod top_terms;
pub mod vocabulary;

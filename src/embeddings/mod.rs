// Embedding similarity: dense vectors per document and a pairwise ranking.
//
// The Embedder trait is the capability boundary. OnnxEmbedder is the local
// implementation; download.rs fetches its files.

pub mod download;
pub mod onnx;
pub mod similarity;
pub mod traits;

// Embedder trait: the swap-ready abstraction over the embedding model.
//
// The similarity engine only needs `text -> fixed-dimension vector`. The
// default implementation runs a local ONNX sentence transformer; tests use a
// deterministic hashing embedder.

use anyhow::Result;
use async_trait::async_trait;

/// External embedding capability.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Dimension every returned vector must have.
    fn dimension(&self) -> usize;

    /// Embed one text. Vectors are contractually unit-normalized.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

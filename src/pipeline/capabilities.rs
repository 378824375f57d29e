// Capability loading for the two model-backed branches.
//
// Capabilities are constructed when a branch starts and dropped when it
// ends. The orchestrator asks a loader for them instead of reaching for
// global model state, so tests can hand in fakes.

use std::path::PathBuf;

use crate::embeddings::download::embedding_model_dir;
use crate::embeddings::onnx::{model_by_name, OnnxEmbedder, KNOWN_MODELS};
use crate::embeddings::traits::Embedder;
use crate::error::PipelineError;
use crate::tokenize::lexicon::{LexiconAnalyzer, LexiconOptions};
use crate::tokenize::traits::Analyzer;

/// Source of the linguistic analyzer and the embedder.
pub trait CapabilityLoader {
    fn load_analyzer(&self) -> Result<Box<dyn Analyzer>, PipelineError>;

    fn load_embedder(&self) -> Result<Box<dyn Embedder>, PipelineError>;
}

/// Loads the on-disk lexicon analyzer and the local ONNX embedder.
#[derive(Debug, Clone)]
pub struct LocalModels {
    pub lexicon: LexiconOptions,
    /// One of the known embedding models, looked up when the embedder loads
    pub embedding_model_name: String,
    /// Base model directory; the model lives in a subdirectory named after it
    pub model_dir: PathBuf,
}

impl CapabilityLoader for LocalModels {
    fn load_analyzer(&self) -> Result<Box<dyn Analyzer>, PipelineError> {
        Ok(Box::new(LexiconAnalyzer::load(&self.lexicon)?))
    }

    fn load_embedder(&self) -> Result<Box<dyn Embedder>, PipelineError> {
        let model = model_by_name(&self.embedding_model_name).ok_or_else(|| {
            let known: Vec<&str> = KNOWN_MODELS.iter().map(|m| m.name).collect();
            PipelineError::unavailable(
                "embedding model",
                format!(
                    "unknown model `{}`. Set TOPICMAP_EMBEDDING_MODEL to one of: {}",
                    self.embedding_model_name,
                    known.join(", ")
                ),
            )
        })?;
        let dir = embedding_model_dir(&self.model_dir, &model);
        Ok(Box::new(OnnxEmbedder::load(model, &dir)?))
    }
}

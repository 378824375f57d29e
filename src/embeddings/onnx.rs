// Local ONNX sentence embedder.
//
// Runs a sentence-transformers model exported to ONNX: tokenize, one forward
// pass, mean-pool the token embeddings over the attention mask, then scale
// to unit length (the same normalization sentence-transformers applies with
// normalize_embeddings=True). No network access at inference time.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::debug;

use super::traits::Embedder;
use crate::error::PipelineError;

const CAPABILITY: &str = "embedding model";

/// A sentence-transformers model this embedder knows how to feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddingModel {
    /// Name used for the model directory and in configuration
    pub name: &'static str,
    /// HuggingFace repository to download from
    pub repo: &'static str,
    pub dimension: usize,
    /// Maximum sequence length the model was trained with
    pub max_seq_len: usize,
    /// The exported graph declares a `token_type_ids` input. Every BertModel
    /// export does, whichever tokenizer feeds it.
    pub uses_token_type_ids: bool,
}

static BERT_INPUTS: [&str; 3] = ["input_ids", "attention_mask", "token_type_ids"];

impl EmbeddingModel {
    /// Names of the graph inputs fed on every forward pass, in order.
    pub fn input_names(&self) -> &'static [&'static str] {
        if self.uses_token_type_ids {
            &BERT_INPUTS
        } else {
            &BERT_INPUTS[..2]
        }
    }
}

/// Multilingual paraphrase model. BERT architecture behind an XLM-R
/// tokenizer, covers Catalan.
pub const MULTILINGUAL_MINILM: EmbeddingModel = EmbeddingModel {
    name: "paraphrase-multilingual-MiniLM-L12-v2",
    repo: "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2",
    dimension: 384,
    max_seq_len: 128,
    uses_token_type_ids: true,
};

/// English-only MiniLM.
pub const ENGLISH_MINILM: EmbeddingModel = EmbeddingModel {
    name: "all-MiniLM-L6-v2",
    repo: "sentence-transformers/all-MiniLM-L6-v2",
    dimension: 384,
    max_seq_len: 256,
    uses_token_type_ids: true,
};

pub const KNOWN_MODELS: [EmbeddingModel; 2] = [MULTILINGUAL_MINILM, ENGLISH_MINILM];

/// Look up a known model by name.
pub fn model_by_name(name: &str) -> Option<EmbeddingModel> {
    KNOWN_MODELS.iter().copied().find(|m| m.name == name)
}

/// Sentence embedder backed by an ONNX session.
///
/// The session sits behind Arc<Mutex> because `Session::run` needs `&mut`
/// and inference is moved onto a blocking thread.
pub struct OnnxEmbedder {
    model: EmbeddingModel,
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl OnnxEmbedder {
    /// Load `model.onnx` and `tokenizer.json` from `model_dir`.
    ///
    /// Missing or unloadable files mean the capability is unavailable.
    pub fn load(model: EmbeddingModel, model_dir: &Path) -> Result<Self, PipelineError> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        for path in [&model_path, &tokenizer_path] {
            if !path.exists() {
                return Err(PipelineError::unavailable(
                    CAPABILITY,
                    format!(
                        "{} not found. Run `topicmap download-model` to download it.",
                        path.display()
                    ),
                ));
            }
        }

        let session = Session::builder()
            .and_then(|builder| builder.commit_from_file(&model_path))
            .map_err(|e| {
                PipelineError::unavailable(
                    CAPABILITY,
                    format!("failed to load {}: {e}", model_path.display()),
                )
            })?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            PipelineError::unavailable(CAPABILITY, format!("failed to load tokenizer: {e}"))
        })?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: model.max_seq_len,
                ..TruncationParams::default()
            }))
            .map_err(|e| {
                PipelineError::unavailable(CAPABILITY, format!("invalid truncation settings: {e}"))
            })?;
        tokenizer.with_padding(None);

        debug!(
            model = model.name,
            dir = %model_dir.display(),
            inputs = ?model.input_names(),
            "Loaded sentence embedding model"
        );

        Ok(Self {
            model,
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl Embedder for OnnxEmbedder {
    fn dimension(&self) -> usize {
        self.model.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let model = self.model;
        let text = text.to_string();

        tokio::task::spawn_blocking(move || embed_sync(&model, &session, &tokenizer, &text))
            .await
            .context("spawn_blocking panicked")?
    }
}

/// Tokenize, run inference and pool one text. Runs on a blocking thread.
fn embed_sync(
    model: &EmbeddingModel,
    session: &Mutex<Session>,
    tokenizer: &Tokenizer,
    text: &str,
) -> Result<Vec<f32>> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

    let seq_len = encoding.get_ids().len();
    if seq_len == 0 {
        return Ok(vec![0.0; model.dimension]);
    }

    let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| i64::from(id)).collect();
    let attention_mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .map(|&m| i64::from(m))
        .collect();

    let shape = [1_i64, seq_len as i64];
    let input_ids_tensor =
        Tensor::from_array((shape, input_ids)).context("Failed to create input_ids tensor")?;
    let attention_mask_tensor = Tensor::from_array((shape, attention_mask.clone()))
        .context("Failed to create attention_mask tensor")?;

    // Output is last_hidden_state: [1, seq_len, dim]
    let hidden_states = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        let outputs = if model.input_names().contains(&"token_type_ids") {
            let token_type_ids_tensor = Tensor::from_array((shape, vec![0_i64; seq_len]))
                .context("Failed to create token_type_ids tensor")?;
            session.run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            })
        } else {
            session.run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor
            })
        }
        .context("Embedding ONNX inference failed")?;

        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract embedding output tensor")?;

        data.to_vec()
    };

    if hidden_states.len() != seq_len * model.dimension {
        anyhow::bail!(
            "Unexpected embedding output size {} (expected {} tokens x {} dims)",
            hidden_states.len(),
            seq_len,
            model.dimension
        );
    }

    let pooled = mean_pool(&hidden_states, &attention_mask, model.dimension);
    Ok(unit_normalize(pooled))
}

/// Average token embeddings, weighted by the attention mask.
pub fn mean_pool(hidden_states: &[f32], attention_mask: &[i64], dim: usize) -> Vec<f32> {
    let mut sum = vec![0.0_f64; dim];
    let mut mask_sum = 0.0_f64;

    for (j, &mask) in attention_mask.iter().enumerate() {
        if mask > 0 {
            let weight = mask as f64;
            mask_sum += weight;
            let offset = j * dim;
            for (k, acc) in sum.iter_mut().enumerate() {
                *acc += f64::from(hidden_states[offset + k]) * weight;
            }
        }
    }

    if mask_sum > 0.0 {
        for val in &mut sum {
            *val /= mask_sum;
        }
    }

    sum.into_iter().map(|v| v as f32).collect()
}

/// Scale to unit L2 length. A zero vector is returned unchanged.
pub fn unit_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector
        .iter()
        .map(|&v| f64::from(v).powi(2))
        .sum::<f64>()
        .sqrt();
    if norm > 0.0 {
        for v in &mut vector {
            *v = (f64::from(*v) / norm) as f32;
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_pool_ignores_padding() {
        // Two tokens of dim 2, second one masked out
        let hidden = vec![1.0, 3.0, 100.0, 100.0];
        let pooled = mean_pool(&hidden, &[1, 0], 2);
        assert_eq!(pooled, vec![1.0, 3.0]);
    }

    #[test]
    fn test_mean_pool_averages() {
        let hidden = vec![1.0, 0.0, 0.0, 1.0];
        let pooled = mean_pool(&hidden, &[1, 1], 2);
        assert_eq!(pooled, vec![0.5, 0.5]);
    }

    #[test]
    fn test_unit_normalize() {
        let v = unit_normalize(vec![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert_eq!(unit_normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_model_lookup() {
        assert_eq!(
            model_by_name("paraphrase-multilingual-MiniLM-L12-v2"),
            Some(MULTILINGUAL_MINILM)
        );
        assert_eq!(model_by_name("unknown"), None);
    }

    #[test]
    fn test_known_models_feed_token_type_ids() {
        for model in KNOWN_MODELS {
            assert_eq!(
                model.input_names(),
                &["input_ids", "attention_mask", "token_type_ids"],
                "{}",
                model.name
            );
        }
    }

    #[test]
    fn test_input_names_without_token_type_ids() {
        let model = EmbeddingModel {
            uses_token_type_ids: false,
            ..MULTILINGUAL_MINILM
        };
        assert_eq!(model.input_names(), &["input_ids", "attention_mask"]);
    }

    #[test]
    fn test_load_missing_files_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        match OnnxEmbedder::load(MULTILINGUAL_MINILM, dir.path()) {
            Err(PipelineError::ExternalModelUnavailable { reason, .. }) => {
                assert!(reason.contains("model.onnx"), "{reason}");
            }
            Err(other) => panic!("expected ExternalModelUnavailable, got {other}"),
            Ok(_) => panic!("load should fail without model files"),
        }
    }
}

// Model download helper for the ONNX sentence embedder.
//
// Fetches `tokenizer.json` and `onnx/model.onnx` from the model's
// HuggingFace repository into `<model_dir>/<model name>/`. Files already on
// disk are skipped, so re-running is cheap.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::onnx::EmbeddingModel;

const HF_BASE_URL: &str = "https://huggingface.co";

/// Remote path of the ONNX export inside a sentence-transformers repo.
const REMOTE_MODEL_FILE: &str = "onnx/model.onnx";
const TOKENIZER_FILE: &str = "tokenizer.json";
const MODEL_FILE: &str = "model.onnx";

/// Default directory for storing model files.
/// Uses the platform data directory: ~/.local/share/topicmap/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("topicmap")
        .join("models")
}

/// Subdirectory within `base` holding one embedding model.
pub fn embedding_model_dir(base: &Path, model: &EmbeddingModel) -> PathBuf {
    base.join(model.name)
}

/// Check whether both required model files exist.
pub fn embedding_files_present(base: &Path, model: &EmbeddingModel) -> bool {
    let dir = embedding_model_dir(base, model);
    dir.join(MODEL_FILE).exists() && dir.join(TOKENIZER_FILE).exists()
}

/// Download the embedding model into `base`.
pub async fn download_model(base: &Path, model: &EmbeddingModel) -> Result<()> {
    let dir = embedding_model_dir(base, model);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    println!("\nSentence embedding model ({}):", model.name);

    let repo_url = format!("{HF_BASE_URL}/{}/resolve/main", model.repo);

    let tokenizer_path = dir.join(TOKENIZER_FILE);
    if tokenizer_path.exists() {
        info!("Embedding tokenizer already exists, skipping");
        println!("  {TOKENIZER_FILE} (already exists)");
    } else {
        println!("  Downloading {TOKENIZER_FILE}...");
        download_file(&format!("{repo_url}/{TOKENIZER_FILE}"), &tokenizer_path, false).await?;
    }

    let model_path = dir.join(MODEL_FILE);
    if model_path.exists() {
        info!("Embedding model already exists, skipping");
        println!("  {MODEL_FILE} (already exists)");
    } else {
        println!("  Downloading {MODEL_FILE}...");
        download_file(&format!("{repo_url}/{REMOTE_MODEL_FILE}"), &model_path, true).await?;
    }

    Ok(())
}

/// Download a single file from a URL to a local path.
/// If `show_progress` is true, display a progress bar.
async fn download_file(url: &str, dest: &Path, show_progress: bool) -> Result<()> {
    let client = reqwest::Client::new();
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = if show_progress {
        let pb = match response.content_length() {
            Some(size) => {
                let pb = ProgressBar::new(size);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                        .expect("valid template")
                        .progress_chars("=> "),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("    {spinner} {bytes}")
                        .expect("valid template"),
                );
                pb
            }
        };
        Some(pb)
    } else {
        None
    };

    // Write to a temporary name so an interrupted download never looks complete
    let partial = dest.with_extension("part");
    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        bytes.extend_from_slice(&chunk);
        if let Some(ref pb) = pb {
            pb.set_position(bytes.len() as u64);
        }
    }

    std::fs::write(&partial, &bytes)
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move {} into place", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

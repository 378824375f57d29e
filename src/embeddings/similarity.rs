// Pairwise cosine similarity ranking.
//
// Every unordered document pair appears once, with `doc_a` earlier in
// corpus order than `doc_b`. The ranking is sorted by descending score and
// ties fall back to (doc_a, doc_b) in lexicographic order. A dense O(n²·k)
// pass is fine for corpora of tens to low hundreds of articles.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{debug, info};

use super::traits::Embedder;
use crate::corpus::Document;
use crate::error::PipelineError;

/// One ranked document pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityPair {
    pub doc_a: String,
    pub doc_b: String,
    pub score: f64,
}

/// Cosine similarity: dot product over the product of norms.
///
/// Computed as a true cosine even though embeddings should already be unit
/// length. Returns 0.0 for mismatched dimensions, empty input or a zero
/// vector; the result is clamped to [-1, 1] against rounding drift.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum();
    let mag_a: f64 = a.iter().map(|&x| f64::from(x).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|&x| f64::from(x).powi(2)).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}

/// Rank all pairs of `ids`, where `vectors[i]` belongs to `ids[i]`.
pub fn rank_pairs(ids: &[&str], vectors: &[Vec<f32>]) -> Vec<SimilarityPair> {
    let n = ids.len().min(vectors.len());
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push(SimilarityPair {
                doc_a: ids[i].to_string(),
                doc_b: ids[j].to_string(),
                score: cosine_similarity(&vectors[i], &vectors[j]),
            });
        }
    }

    pairs.sort_by(compare_pairs);
    pairs
}

fn compare_pairs(a: &SimilarityPair, b: &SimilarityPair) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.doc_a.cmp(&b.doc_a))
        .then_with(|| a.doc_b.cmp(&b.doc_b))
}

/// Embed every document once and rank all pairs.
///
/// `texts[i]` is the text embedded for `documents[i]`. Any embed failure or
/// dimension mismatch stops the branch; nothing is retried.
pub async fn similarity_ranking(
    documents: &[Document],
    texts: &[String],
    embedder: &dyn Embedder,
) -> Result<Vec<SimilarityPair>, PipelineError> {
    let expected = embedder.dimension();
    let mut vectors = Vec::with_capacity(documents.len());

    for (doc, text) in documents.iter().zip(texts) {
        let vector = embedder
            .embed(text)
            .await
            .map_err(|e| PipelineError::EmbeddingFailed {
                document: doc.id.clone(),
                message: format!("{e:#}"),
            })?;

        if vector.len() != expected {
            return Err(PipelineError::InvalidEmbedding {
                document: doc.id.clone(),
                expected,
                actual: vector.len(),
            });
        }

        debug!(document = %doc.id, dim = vector.len(), "Embedded document");
        vectors.push(vector);
    }

    let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    let pairs = rank_pairs(&ids, &vectors);

    info!(
        documents = documents.len(),
        pairs = pairs.len(),
        dim = expected,
        "Ranked document similarities"
    );

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_proportional() {
        // Same direction, different magnitudes
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![2.0, 4.0, 6.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_opposite_is_negative() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_rank_pairs_orders_and_counts() {
        let ids = ["a", "b", "c"];
        let vectors = vec![vec![1.0, 0.0], vec![1.0, 0.1], vec![0.0, 1.0]];
        let pairs = rank_pairs(&ids, &vectors);

        assert_eq!(pairs.len(), 3);
        assert_eq!((pairs[0].doc_a.as_str(), pairs[0].doc_b.as_str()), ("a", "b"));
        assert!(pairs.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_rank_pairs_tie_break() {
        // Every pair has the same score
        let ids = ["z", "m", "a"];
        let vectors = vec![vec![1.0, 0.0]; 3];
        let pairs = rank_pairs(&ids, &vectors);
        let order: Vec<(&str, &str)> = pairs
            .iter()
            .map(|p| (p.doc_a.as_str(), p.doc_b.as_str()))
            .collect();
        assert_eq!(order, vec![("m", "a"), ("z", "a"), ("z", "m")]);
    }

    #[test]
    fn test_single_document_has_no_pairs() {
        assert!(rank_pairs(&["only"], &[vec![1.0]]).is_empty());
    }
}

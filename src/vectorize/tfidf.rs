// TF-IDF weighting over a term-count model.
//
//   idf(t)    = ln((1 + D) / (1 + df(t))) + 1
//   w(t, d)   = tf(t, d) * idf(t)
//
// The smoothed IDF is always >= 1 for a term in the vocabulary, so no
// present term ever gets weight zero. Each document row is then scaled to
// unit L2 length, which makes rows directly comparable by dot product.

use tracing::info;

use super::count::CountModel;
use super::top_terms::{top_terms, TopTermList};
use super::vocabulary::{TermMatrix, Vocabulary};
use crate::tokenize::traits::TokenStream;

#[derive(Debug, Clone)]
pub struct TfIdfModel {
    pub vocabulary: Vocabulary,
    /// IDF weight per vocabulary column
    pub idf: Vec<f64>,
    /// L2-normalized weights
    pub matrix: TermMatrix<f64>,
}

/// Smoothed inverse document frequency.
pub fn smoothed_idf(n_documents: usize, document_frequency: usize) -> f64 {
    ((1.0 + n_documents as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
}

impl TfIdfModel {
    /// Fit directly from token streams.
    pub fn fit(streams: &[TokenStream]) -> Self {
        Self::from_counts(&CountModel::fit(streams))
    }

    /// Weight an existing count model.
    pub fn from_counts(counts: &CountModel) -> Self {
        let n_documents = counts.n_documents();
        let idf: Vec<f64> = counts
            .document_frequency()
            .into_iter()
            .map(|df| smoothed_idf(n_documents, df))
            .collect();

        let rows = counts
            .matrix
            .rows()
            .map(|row| {
                let weighted: Vec<(usize, f64)> = row
                    .iter()
                    .map(|&(col, tf)| (col, f64::from(tf) * idf[col]))
                    .collect();
                l2_normalize(weighted)
            })
            .collect();

        let matrix = TermMatrix::from_rows(rows, counts.vocabulary.len());

        info!(
            documents = n_documents,
            vocabulary = counts.vocabulary.len(),
            "Built TF-IDF matrix"
        );

        Self {
            vocabulary: counts.vocabulary.clone(),
            idf,
            matrix,
        }
    }

    /// IDF of a term, `None` if it is not in the vocabulary.
    pub fn idf_of(&self, term: &str) -> Option<f64> {
        self.vocabulary.index_of(term).map(|col| self.idf[col])
    }

    /// Highest-weighted terms of one document.
    pub fn top_terms(&self, doc: usize, n: usize) -> TopTermList {
        top_terms(self.matrix.row(doc), &self.vocabulary, n)
    }
}

/// Scale a sparse row to unit length. Empty rows stay empty.
fn l2_normalize(mut row: Vec<(usize, f64)>) -> Vec<(usize, f64)> {
    let norm = row.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut row {
            *w /= norm;
        }
    }
    row
}

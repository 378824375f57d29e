// Term-count (bag-of-words) model.
//
// Each document's row is a faithful histogram of its token stream: the row
// sums to the stream length and a cell is nonzero iff the term occurs.

use std::collections::HashMap;

use tracing::info;

use super::top_terms::{top_terms, TopTermList};
use super::vocabulary::{TermMatrix, Vocabulary};
use crate::tokenize::traits::TokenStream;

#[derive(Debug, Clone)]
pub struct CountModel {
    pub vocabulary: Vocabulary,
    pub matrix: TermMatrix<u32>,
}

impl CountModel {
    /// Build the vocabulary and count matrix, one row per stream in order.
    pub fn fit(streams: &[TokenStream]) -> Self {
        let vocabulary = Vocabulary::from_streams(streams);

        let rows = streams
            .iter()
            .map(|stream| {
                let mut counts: HashMap<&str, u32> = HashMap::new();
                for token in stream.iter() {
                    *counts.entry(token).or_insert(0) += 1;
                }
                let mut row: Vec<(usize, u32)> = counts
                    .into_iter()
                    .filter_map(|(term, count)| vocabulary.index_of(term).map(|col| (col, count)))
                    .collect();
                row.sort_unstable_by_key(|&(col, _)| col);
                row
            })
            .collect();

        let matrix = TermMatrix::from_rows(rows, vocabulary.len());

        info!(
            documents = matrix.n_rows(),
            vocabulary = vocabulary.len(),
            "Built term-count matrix"
        );

        Self { vocabulary, matrix }
    }

    /// Number of documents each term occurs in, indexed by column.
    pub fn document_frequency(&self) -> Vec<usize> {
        let mut df = vec![0usize; self.vocabulary.len()];
        for row in self.matrix.rows() {
            for &(col, _) in row {
                df[col] += 1;
            }
        }
        df
    }

    pub fn n_documents(&self) -> usize {
        self.matrix.n_rows()
    }

    /// Highest-count terms of one document.
    pub fn top_terms(&self, doc: usize, n: usize) -> TopTermList {
        top_terms(self.matrix.row(doc), &self.vocabulary, n)
    }
}

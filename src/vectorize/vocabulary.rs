// Vocabulary and sparse term matrix.
//
// Columns are assigned in lexicographic term order so two runs over the
// same token streams produce identical column layouts regardless of
// document order or hash seeds.

use std::collections::{BTreeSet, HashMap};

use crate::tokenize::traits::TokenStream;

/// Distinct terms observed by one methodology, with stable column indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Union of all terms across the streams, sorted lexicographically.
    pub fn from_streams(streams: &[TokenStream]) -> Self {
        let distinct: BTreeSet<&str> = streams.iter().flat_map(|s| s.iter()).collect();
        let terms: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Document × term matrix stored as sparse rows.
///
/// Each row holds only the columns with a nonzero value, in ascending
/// column order. A missing cell means the term never occurs in that
/// document.
#[derive(Debug, Clone, PartialEq)]
pub struct TermMatrix<T> {
    rows: Vec<Vec<(usize, T)>>,
    n_cols: usize,
}

impl<T: Copy> TermMatrix<T> {
    pub(crate) fn from_rows(rows: Vec<Vec<(usize, T)>>, n_cols: usize) -> Self {
        Self { rows, n_cols }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Nonzero cells of one document row.
    pub fn row(&self, doc: usize) -> &[(usize, T)] {
        self.rows.get(doc).map(Vec::as_slice).unwrap_or(&[])
    }

    /// A single cell, `None` when the term is absent from the document.
    pub fn get(&self, doc: usize, column: usize) -> Option<T> {
        let row = self.row(doc);
        row.binary_search_by_key(&column, |&(c, _)| c)
            .ok()
            .map(|i| row[i].1)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[(usize, T)]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

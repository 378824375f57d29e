// Top-term extraction.
//
// Reduces a document row to its N highest-scoring terms. Only positive
// scores are candidates. Ties on score fall back to ascending term order, so
// the result is a total order and reruns are byte-identical.

use std::cmp::Ordering;

use serde::Serialize;

use super::vocabulary::Vocabulary;

/// One entry of a top-term list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTerm {
    pub term: String,
    pub score: f64,
}

/// How scores are rendered for display. Comparisons always use full precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreFormat {
    /// Raw counts, rendered as integers: `term(3)`
    Count,
    /// Weights with a fixed number of decimals: `term(0.412)`
    Fixed(usize),
}

/// A document's top terms, descending by score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopTermList {
    pub entries: Vec<TopTerm>,
}

impl TopTermList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn terms(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.term.as_str()).collect()
    }

    /// Render as `term(score), term(score), ...`.
    pub fn render(&self, format: ScoreFormat) -> String {
        self.entries
            .iter()
            .map(|entry| match format {
                ScoreFormat::Count => format!("{}({})", entry.term, entry.score.round() as i64),
                ScoreFormat::Fixed(precision) => {
                    format!("{}({:.*})", entry.term, precision, entry.score)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Rank the positive cells of `row` and keep the first `n`.
pub fn top_terms<T>(row: &[(usize, T)], vocabulary: &Vocabulary, n: usize) -> TopTermList
where
    T: Copy + Into<f64>,
{
    let mut entries: Vec<TopTerm> = row
        .iter()
        .filter_map(|&(col, value)| {
            let score: f64 = value.into();
            if score > 0.0 {
                vocabulary.term(col).map(|term| TopTerm {
                    term: term.to_string(),
                    score,
                })
            } else {
                None
            }
        })
        .collect();

    entries.sort_by(compare_entries);
    entries.truncate(n);

    TopTermList { entries }
}

/// Descending score, then ascending term.
fn compare_entries(a: &TopTerm, b: &TopTerm) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.term.cmp(&b.term))
}

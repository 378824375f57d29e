// Corpus: the fixed, ordered set of documents one run analyzes.
//
// Documents are created once at load time and never mutated. Corpus order
// is significant: it decides which id is `doc_a` in a similarity pair.

pub mod html;
pub mod loader;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A single article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Identity within the run (filename or title)
    pub id: String,
    pub title: String,
    pub body: String,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// Title and body joined as `"{title}. {body}"`.
    ///
    /// When either side is blank only the other is returned, so a document
    /// with an empty body tokenizes to its title alone.
    pub fn full_text(&self) -> String {
        let title = self.title.trim();
        let body = self.body.trim();
        match (title.is_empty(), body.is_empty()) {
            (false, false) => format!("{title}. {body}"),
            (false, true) => title.to_string(),
            _ => body.to_string(),
        }
    }
}

/// An ordered, non-empty collection of documents with unique ids.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Validate and wrap a document list.
    ///
    /// Rows are numbered from 1 in error messages, matching the data rows of
    /// the source table.
    pub fn new(documents: Vec<Document>) -> Result<Self, PipelineError> {
        if documents.is_empty() {
            return Err(PipelineError::EmptyCorpus);
        }

        let mut seen = HashSet::with_capacity(documents.len());
        for (i, doc) in documents.iter().enumerate() {
            if doc.id.trim().is_empty() {
                return Err(PipelineError::invalid_input(i + 1, "id", "is empty"));
            }
            if !seen.insert(doc.id.as_str()) {
                return Err(PipelineError::invalid_input(
                    i + 1,
                    "id",
                    format!("duplicates an earlier document (`{}`)", doc.id),
                ));
            }
        }

        Ok(Self { documents })
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always false for a constructed corpus; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.id.as_str()).collect()
    }
}

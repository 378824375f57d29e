// Corpus loading from a delimited table.
//
// Required columns are checked against the header before any row is read.
// A bad row rejects the whole run: term statistics over a partially loaded
// corpus are meaningless, so there is no silent per-row skip.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::{Corpus, Document};
use crate::error::PipelineError;

/// Header names of the three required columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub id: String,
    pub title: String,
    pub body: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            title: "title".to_string(),
            body: "body".to_string(),
        }
    }
}

/// Open and parse a corpus CSV.
pub fn load_corpus(path: &Path, columns: &ColumnNames) -> Result<Corpus> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open corpus file {}", path.display()))?;
    let corpus = read_corpus(file, columns)?;

    info!(
        documents = corpus.len(),
        path = %path.display(),
        "Loaded corpus"
    );
    Ok(corpus)
}

/// Parse a corpus from any reader. Header row is mandatory.
pub fn read_corpus<R: Read>(reader: R, columns: &ColumnNames) -> Result<Corpus, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::invalid_input(0, "header", format!("is unreadable: {e}")))?
        .clone();

    let position = |name: &str| {
        headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
            PipelineError::invalid_input(
                0,
                name,
                format!(
                    "is missing from the header (found: {})",
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            )
        })
    };
    let id_col = position(columns.id.as_str())?;
    let title_col = position(columns.title.as_str())?;
    let body_col = position(columns.body.as_str())?;

    let mut documents = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let row = i + 1;
        let record = record
            .map_err(|e| PipelineError::invalid_input(row, "record", format!("is malformed: {e}")))?;

        let field = |col: usize, name: &str| {
            record
                .get(col)
                .map(str::to_string)
                .ok_or_else(|| PipelineError::invalid_input(row, name, "is missing"))
        };

        let id = field(id_col, columns.id.as_str())?;
        if id.trim().is_empty() {
            return Err(PipelineError::invalid_input(row, &columns.id, "is empty"));
        }

        documents.push(Document {
            id: id.trim().to_string(),
            title: field(title_col, columns.title.as_str())?,
            body: field(body_col, columns.body.as_str())?,
        });
    }

    Corpus::new(documents)
}

// CSV persistence of the result tables.
//
// The core hands over ordered records; this module owns the file format.
// Writers take any io::Write so tests can render into memory, and the
// `*_file` helpers create parent directories first.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::corpus::Document;
use crate::embeddings::similarity::SimilarityPair;
use crate::pipeline::analyze::TopTermRow;
use crate::pipeline::preprocess::TokenTableRow;
use crate::vectorize::top_terms::ScoreFormat;

/// Decimals written for similarity scores.
pub const SIMILARITY_PRECISION: usize = 6;

/// Decimals shown for TF-IDF weights.
pub const WEIGHT_PRECISION: usize = 3;

pub const BOW_FILE: &str = "bow_top_terms.csv";
pub const TFIDF_FILE: &str = "tfidf_top_terms.csv";
pub const SIMILARITY_FILE: &str = "similarity.csv";

#[derive(Serialize)]
struct TopTermRecord<'a> {
    document: &'a str,
    top_terms: String,
}

#[derive(Serialize)]
struct SimilarityRecord<'a> {
    doc_a: &'a str,
    doc_b: &'a str,
    similarity: String,
}

#[derive(Serialize)]
struct CorpusRecord<'a> {
    id: &'a str,
    title: &'a str,
    body: String,
}

/// Write `document,top_terms` rows.
pub fn write_top_terms<W: Write>(writer: W, rows: &[TopTermRow], format: ScoreFormat) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(TopTermRecord {
            document: &row.document,
            top_terms: row.terms.render(format),
        })?;
    }
    csv.flush().context("Failed to flush top-term table")?;
    Ok(())
}

/// Write `doc_a,doc_b,similarity` rows in ranking order.
pub fn write_similarity<W: Write>(writer: W, pairs: &[SimilarityPair]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for pair in pairs {
        csv.serialize(SimilarityRecord {
            doc_a: &pair.doc_a,
            doc_b: &pair.doc_b,
            similarity: format!("{:.*}", SIMILARITY_PRECISION, pair.score),
        })?;
    }
    csv.flush().context("Failed to flush similarity table")?;
    Ok(())
}

/// Write a per-methodology token table.
pub fn write_token_table<W: Write>(writer: W, rows: &[TokenTableRow]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush().context("Failed to flush token table")?;
    Ok(())
}

/// Write an `id,title,body` corpus table. Line breaks inside a body are
/// flattened so every article sits on one line.
pub fn write_corpus<W: Write>(writer: W, documents: &[Document]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);
    for doc in documents {
        csv.serialize(CorpusRecord {
            id: &doc.id,
            title: &doc.title,
            body: flatten_lines(&doc.body),
        })?;
    }
    csv.flush().context("Failed to flush corpus table")?;
    Ok(())
}

fn flatten_lines(text: &str) -> String {
    text.replace('\r', "").replace('\n', " ").trim().to_string()
}

/// Create `path` (and its parent directories) for writing.
pub fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("Failed to create {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorize::top_terms::{TopTerm, TopTermList};

    fn render<F: FnOnce(&mut Vec<u8>) -> Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn top_terms_table() {
        let rows = vec![TopTermRow {
            document: "a.html".to_string(),
            terms: TopTermList {
                entries: vec![
                    TopTerm { term: "pluja".to_string(), score: 0.81234 },
                    TopTerm { term: "sol".to_string(), score: 0.5 },
                ],
            },
        }];
        let out = render(|buf| write_top_terms(buf, &rows, ScoreFormat::Fixed(3)));
        assert_eq!(out, "document,top_terms\na.html,\"pluja(0.812), sol(0.500)\"\n");
    }

    #[test]
    fn similarity_table() {
        let pairs = vec![SimilarityPair {
            doc_a: "a".to_string(),
            doc_b: "b".to_string(),
            score: 0.25,
        }];
        let out = render(|buf| write_similarity(buf, &pairs));
        assert_eq!(out, "doc_a,doc_b,similarity\na,b,0.250000\n");
    }

    #[test]
    fn corpus_table_flattens_bodies() {
        let docs = vec![Document::new("a.html", "Títol", "Primer.\n\nSegon.\r\n")];
        let out = render(|buf| write_corpus(buf, &docs));
        assert_eq!(
            out,
            "\"id\",\"title\",\"body\"\n\"a.html\",\"Títol\",\"Primer.  Segon.\"\n"
        );
    }

    #[test]
    fn create_file_makes_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        create_file(&path).unwrap();
        assert!(path.exists());
    }
}

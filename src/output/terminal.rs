// Colored terminal output for analysis and preprocessing results.
//
// main.rs display calls delegate here. Everything is printed to stdout;
// diagnostics go through tracing instead.

use colored::Colorize;

use super::report::{BranchStatus, RunSummary};
use super::truncate_chars;
use crate::embeddings::similarity::SimilarityPair;
use crate::pipeline::analyze::TopTermRow;
use crate::pipeline::preprocess::TokenTables;
use crate::tokenize::traits::Methodology;
use crate::vectorize::top_terms::ScoreFormat;

/// Documents shown per top-term table.
const PREVIEW_DOCUMENTS: usize = 3;

/// Similar pairs shown.
const PREVIEW_PAIRS: usize = 5;

/// Print per-branch status and output locations.
pub fn display_run_summary(summary: &RunSummary) {
    println!(
        "\n{}",
        format!("=== Analysis ({} documents) ===", summary.documents).bold()
    );
    for branch in &summary.branches {
        match branch.status {
            BranchStatus::Completed => {
                let output = branch
                    .output
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!(
                    "  {} {:<22} {:>5} rows  {}",
                    "ok".green().bold(),
                    branch.branch.label(),
                    branch.rows,
                    output.dimmed()
                );
            }
            BranchStatus::Failed => {
                println!(
                    "  {} {:<22} {}",
                    "!!".red().bold(),
                    branch.branch.label(),
                    branch.error.as_deref().unwrap_or("unknown error").red()
                );
            }
        }
    }
    println!();
}

/// Print the top terms of the first few documents.
pub fn display_top_terms(title: &str, rows: &[TopTermRow], format: ScoreFormat) {
    println!("{}", format!("--- {title} ---").bold());
    for row in rows.iter().take(PREVIEW_DOCUMENTS) {
        let terms = if row.terms.is_empty() {
            "(no terms)".dimmed().to_string()
        } else {
            row.terms.render(format)
        };
        println!("  {:<32} {}", row.document.cyan(), terms);
    }
    if rows.len() > PREVIEW_DOCUMENTS {
        println!("  {}", format!("... {} more", rows.len() - PREVIEW_DOCUMENTS).dimmed());
    }
    println!();
}

/// Print the most similar document pairs.
pub fn display_similar_pairs(pairs: &[SimilarityPair]) {
    println!("{}", "--- Most similar documents ---".bold());
    if pairs.is_empty() {
        println!("  {}", "Fewer than two documents, nothing to compare.".dimmed());
    }
    for pair in pairs.iter().take(PREVIEW_PAIRS) {
        println!(
            "  {}  {} <-> {}",
            colorize_score(pair.score),
            pair.doc_a,
            pair.doc_b
        );
    }
    println!();
}

/// Print both tokenizations of the first document side by side.
pub fn display_token_comparison(tables: &TokenTables) {
    for methodology in [Methodology::RuleBased, Methodology::Linguistic] {
        let Some(row) = tables.table(methodology).first() else {
            continue;
        };
        println!(
            "{} {} ({} tokens)",
            methodology.as_str().bold(),
            row.id.cyan(),
            row.n_tokens
        );
        println!("  {}", truncate_chars(&row.sample_tokens, 160).dimmed());
    }
    println!();
}

fn colorize_score(score: f64) -> colored::ColoredString {
    let text = format!("{score:.3}");
    if score >= 0.8 {
        text.green().bold()
    } else if score >= 0.5 {
        text.yellow()
    } else {
        text.normal()
    }
}

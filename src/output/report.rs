// Run summary: a machine-readable record of one `analyze` run.
//
// Written next to the result tables as run_summary.json.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::tables::create_file;
use crate::pipeline::analyze::Branch;

pub const SUMMARY_FILE: &str = "run_summary.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchSummary {
    pub branch: Branch,
    pub status: BranchStatus,
    pub rows: usize,
    /// Table written by the branch; absent when it failed
    pub output: Option<PathBuf>,
    pub error: Option<String>,
}

impl BranchSummary {
    pub fn completed(branch: Branch, rows: usize, output: PathBuf) -> Self {
        Self {
            branch,
            status: BranchStatus::Completed,
            rows,
            output: Some(output),
            error: None,
        }
    }

    pub fn failed(branch: Branch, error: impl ToString) -> Self {
        Self {
            branch,
            status: BranchStatus::Failed,
            rows: 0,
            output: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub corpus: PathBuf,
    pub documents: usize,
    pub top_n: usize,
    pub branches: Vec<BranchSummary>,
}

impl RunSummary {
    pub fn new(corpus: &Path, documents: usize, top_n: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            corpus: corpus.to_path_buf(),
            documents,
            top_n,
            branches: Vec::new(),
        }
    }

    pub fn push(&mut self, branch: BranchSummary) {
        self.branches.push(branch);
    }

    pub fn all_completed(&self) -> bool {
        self.branches
            .iter()
            .all(|b| b.status == BranchStatus::Completed)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run summary")
    }

    /// Write the summary to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut file = create_file(path)?;
        serde_json::to_writer_pretty(&mut file, self)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result analysis: merge outcome records, count them, and run the
//! branch's own outcome analysis.

use crate::runner::{JobError, StandardRunner};
use crate::source::SOURCE_DIR;
use cim_adapters::{RegistryAdapter, WorkerAdapter};
use cim_core::{CommandSpec, OutcomeCounts, Platform};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Merged outcome file, in the artifacts directory and the analysis checkout.
pub const MERGED_OUTCOMES: &str = "outcomes.csv";
pub const ANALYSIS_JOB: &str = "outcome-analysis";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to read outcome file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: std::io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "snake_case")]
pub enum AnalysisVerdict {
    Passed,
    Failed(String),
    /// No outcomes were produced or no analysis command is configured
    Skipped,
}

impl std::fmt::Display for AnalysisVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisVerdict::Passed => f.write_str("passed"),
            AnalysisVerdict::Failed(reason) => write!(f, "failed: {}", reason),
            AnalysisVerdict::Skipped => f.write_str("skipped"),
        }
    }
}

/// Everything the run learned, for the final status and the summary email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalReport {
    pub jobs: usize,
    pub failed_jobs: Vec<String>,
    pub outcomes: OutcomeCounts,
    pub coverage_summary: Option<String>,
    pub analysis: AnalysisVerdict,
}

impl FinalReport {
    pub fn passed(&self) -> bool {
        self.failed_jobs.is_empty() && !matches!(self.analysis, AnalysisVerdict::Failed(_))
    }

    /// One-line description used for the final commit status.
    pub fn description(&self) -> String {
        if self.failed_jobs.is_empty() {
            match &self.analysis {
                AnalysisVerdict::Failed(_) => "Outcome analysis failed".to_string(),
                _ => format!("All {} jobs passed", self.jobs),
            }
        } else {
            format!("Failures: {}", self.failed_jobs.join(", "))
        }
    }
}

/// Concatenate `files` into `dest`, returning the merged content.
pub async fn merge_outcomes(files: &[PathBuf], dest: &Path) -> Result<Vec<u8>, AnalysisError> {
    let mut merged = Vec::new();
    for file in files {
        let content = tokio::fs::read(file)
            .await
            .map_err(|source| AnalysisError::Read { path: file.display().to_string(), source })?;
        merged.extend_from_slice(&content);
        if !merged.is_empty() && !merged.ends_with(b"\n") {
            merged.push(b'\n');
        }
    }
    let write_err = |source| AnalysisError::Write { path: dest.display().to_string(), source };
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    tokio::fs::write(dest, &merged).await.map_err(write_err)?;
    tracing::info!(files = files.len(), bytes = merged.len(), path = %dest.display(), "merged outcome files");
    Ok(merged)
}

/// Run `command outcomes.csv` in a checkout on `platform`.
pub async fn run_analysis<W: WorkerAdapter, R: RegistryAdapter>(
    runner: &StandardRunner<W, R>,
    platform: &Platform,
    merged: &[u8],
    command: &[String],
) -> AnalysisVerdict {
    let Some((program, args)) = command.split_first() else {
        return AnalysisVerdict::Skipped;
    };
    if merged.is_empty() {
        return AnalysisVerdict::Skipped;
    }
    let cmd = CommandSpec::new(program).args(args.iter().cloned()).arg(MERGED_OUTCOMES).cwd(SOURCE_DIR);

    let jw = match runner.open(ANALYSIS_JOB, platform).await {
        Ok(jw) => jw,
        Err(e) => return AnalysisVerdict::Failed(e.to_string()),
    };
    let result: Result<(), JobError> = async {
        let shims = runner.setup(&jw, platform).await?;
        runner.write_file(&jw, &format!("{}/{}", SOURCE_DIR, MERGED_OUTCOMES), merged).await?;
        runner.exec(&jw, &cmd, &shims.env).await?;
        Ok(())
    }
    .await;
    runner.release(&jw).await;

    match result {
        Ok(()) => AnalysisVerdict::Passed,
        Err(e) => {
            tracing::error!(platform = %platform.name, error = %e, "outcome analysis failed");
            AnalysisVerdict::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod tests;

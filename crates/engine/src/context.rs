// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State shared by every job of one run.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Mutable run state, constructed once per run and handed to every job.
///
/// Jobs only write; totals are read after all jobs have joined.
#[derive(Debug, Default)]
pub struct RunContext {
    failed_builds: Mutex<BTreeMap<String, bool>>,
    failed: AtomicBool,
    coverage_summary: Mutex<Option<String>>,
    outcome_files: Mutex<Vec<PathBuf>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed job. Returns true for the first failure of the run.
    pub fn record_failure(&self, job: &str) -> bool {
        self.failed_builds.lock().insert(job.to_string(), true);
        !self.failed.swap(true, Ordering::AcqRel)
    }

    pub fn has_failures(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    /// Names of failed jobs, sorted.
    pub fn failed_jobs(&self) -> Vec<String> {
        self.failed_builds.lock().iter().filter(|(_, failed)| **failed).map(|(name, _)| name.clone()).collect()
    }

    pub fn set_coverage_summary(&self, summary: String) {
        *self.coverage_summary.lock() = Some(summary);
    }

    pub fn coverage_summary(&self) -> Option<String> {
        self.coverage_summary.lock().clone()
    }

    /// Register a persisted outcome file for the final analysis.
    pub fn add_outcome_file(&self, path: PathBuf) {
        self.outcome_files.lock().push(path);
    }

    /// Persisted outcome files, sorted by path.
    pub fn outcome_files(&self) -> Vec<PathBuf> {
        let mut files = self.outcome_files.lock().clone();
        files.sort();
        files
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker adapter: private workspaces on an execution worker and the
//! structured commands run inside them.

mod local;

use async_trait::async_trait;
use cim_core::CommandSpec;
use std::path::PathBuf;
use thiserror::Error;

pub use local::LocalWorkerAdapter;

/// Errors from worker operations
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("no worker available with label `{0}`")]
    NoWorker(String),
    #[error("workspace io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Exec(String),
    #[error("path escapes workspace: {0}")]
    InvalidPath(String),
    #[error("invalid file pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },
}

/// What a job needs from a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRequest {
    pub job: String,
    pub platform: String,
    /// Worker label constraint
    pub label: String,
    /// Container image commands run in, if any
    pub image: Option<String>,
}

/// A private workspace on a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub id: String,
    pub job: String,
    pub platform: String,
    pub label: String,
    pub image: Option<String>,
    /// Root directory as seen by the worker host
    pub root: PathBuf,
}

/// Captured result of a command. A non-zero exit is not an error at this
/// layer; callers decide what failure means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { exit_code: 0, stdout: stdout.into(), stderr: String::new() }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self { exit_code, stdout: String::new(), stderr: stderr.into() }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Adapter for the host job-execution runtime.
#[async_trait]
pub trait WorkerAdapter: Clone + Send + Sync + 'static {
    /// Acquire a fresh private workspace on a worker satisfying the label.
    async fn open(&self, request: WorkspaceRequest) -> Result<Workspace, WorkerError>;

    /// Run a command inside the workspace (and its image, if any).
    async fn exec(&self, ws: &Workspace, cmd: &CommandSpec) -> Result<CommandOutput, WorkerError>;

    /// Create or replace a file, relative to the workspace root.
    async fn write_file(&self, ws: &Workspace, path: &str, content: &[u8])
        -> Result<(), WorkerError>;

    /// Read a file relative to the workspace root; `None` if absent.
    async fn read_file(&self, ws: &Workspace, path: &str) -> Result<Option<Vec<u8>>, WorkerError>;

    /// Relative paths of files matching a glob pattern, sorted.
    async fn list_files(&self, ws: &Workspace, pattern: &str) -> Result<Vec<String>, WorkerError>;

    /// Delete the workspace and everything in it.
    async fn discard(&self, ws: &Workspace) -> Result<(), WorkerError>;
}

/// Reject absolute paths and parent traversal.
pub(crate) fn check_relative(path: &str) -> Result<(), WorkerError> {
    let p = std::path::Path::new(path);
    if p.is_absolute() || p.components().any(|c| matches!(c, std::path::Component::ParentDir)) {
        return Err(WorkerError::InvalidPath(path.to_string()));
    }
    Ok(())
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{ExecCall, FakeWorkerAdapter};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

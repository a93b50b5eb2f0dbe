// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker adapter that runs on this host, optionally inside docker.

use super::{check_relative, CommandOutput, Workspace, WorkerAdapter, WorkerError, WorkspaceRequest};
use crate::subprocess::run_with_timeout;
use async_trait::async_trait;
use cim_core::CommandSpec;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Mount point of the workspace inside job containers.
pub const CONTAINER_WORKDIR: &str = "/var/lib/build";

/// Search path of stock Linux images, and of hosts without `PATH` set.
pub const DEFAULT_PATH: &str = "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// Runs jobs in directories under `root`.
///
/// Only serves the labels it was configured with; other labels fail with
/// [`WorkerError::NoWorker`].
#[derive(Clone)]
pub struct LocalWorkerAdapter {
    root: PathBuf,
    labels: Arc<Vec<String>>,
    docker: String,
    command_timeout: Duration,
    counter: Arc<AtomicU64>,
}

impl LocalWorkerAdapter {
    pub fn new(root: impl Into<PathBuf>, labels: Vec<String>) -> Self {
        Self {
            root: root.into(),
            labels: Arc::new(labels),
            docker: "docker".to_string(),
            command_timeout: Duration::from_secs(6 * 60 * 60),
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn docker(mut self, program: impl Into<String>) -> Self {
        self.docker = program.into();
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    fn resolve(&self, ws: &Workspace, path: &str) -> Result<PathBuf, WorkerError> {
        check_relative(path)?;
        Ok(ws.root.join(path))
    }

    fn host_command(ws: &Workspace, spec: &CommandSpec) -> Result<tokio::process::Command, WorkerError> {
        let dir = match &spec.cwd {
            Some(cwd) => {
                check_relative(cwd)?;
                ws.root.join(cwd)
            }
            None => ws.root.clone(),
        };
        // Relative programs with a directory part resolve against the
        // command's working directory, not ours.
        let program = if spec.program.contains('/') && Path::new(&spec.program).is_relative() {
            dir.join(&spec.program).display().to_string()
        } else {
            spec.program.clone()
        };
        let mut cmd = tokio::process::Command::new(program);
        let inherited = std::env::var("PATH").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        cmd.args(&spec.args).envs(spec.resolved_env(&inherited)).current_dir(dir);
        Ok(cmd)
    }

    fn container_command(&self, ws: &Workspace, image: &str, spec: &CommandSpec) -> Result<tokio::process::Command, WorkerError> {
        let workdir = match &spec.cwd {
            Some(cwd) => {
                check_relative(cwd)?;
                format!("{}/{}", CONTAINER_WORKDIR, cwd)
            }
            None => CONTAINER_WORKDIR.to_string(),
        };
        let mut cmd = tokio::process::Command::new(&self.docker);
        cmd.arg("run")
            .arg("--rm")
            .arg("-v")
            .arg(format!("{}:{}", ws.root.display(), CONTAINER_WORKDIR))
            .arg("-w")
            .arg(workdir);
        for (key, value) in spec.resolved_env(DEFAULT_PATH) {
            cmd.arg("-e").arg(format!("{}={}", key, value));
        }
        cmd.arg(image).arg(&spec.program).args(&spec.args);
        Ok(cmd)
    }
}

fn sanitize(name: &str) -> String {
    name.chars().map(|c| if c.is_ascii_alphanumeric() || "-_.".contains(c) { c } else { '_' }).collect()
}

#[async_trait]
impl WorkerAdapter for LocalWorkerAdapter {
    async fn open(&self, request: WorkspaceRequest) -> Result<Workspace, WorkerError> {
        if !self.labels.iter().any(|l| *l == request.label) {
            return Err(WorkerError::NoWorker(request.label));
        }
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let id = format!("{}-{}", sanitize(&request.job), n);
        let root = self.root.join(&id);
        tokio::fs::create_dir_all(&root).await?;
        tracing::debug!(workspace = %root.display(), job = %request.job, "opened workspace");
        Ok(Workspace {
            id,
            job: request.job,
            platform: request.platform,
            label: request.label,
            image: request.image,
            root,
        })
    }

    async fn exec(&self, ws: &Workspace, spec: &CommandSpec) -> Result<CommandOutput, WorkerError> {
        let cmd = match &ws.image {
            Some(image) => self.container_command(ws, image, spec)?,
            None => Self::host_command(ws, spec)?,
        };
        tracing::info!(job = %ws.job, command = %spec, "exec");
        let output = run_with_timeout(cmd, self.command_timeout, &spec.program)
            .await
            .map_err(WorkerError::Exec)?;
        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn write_file(&self, ws: &Workspace, path: &str, content: &[u8]) -> Result<(), WorkerError> {
        let full = self.resolve(ws, path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, content).await?;
        Ok(())
    }

    async fn read_file(&self, ws: &Workspace, path: &str) -> Result<Option<Vec<u8>>, WorkerError> {
        let full = self.resolve(ws, path)?;
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_files(&self, ws: &Workspace, pattern: &str) -> Result<Vec<String>, WorkerError> {
        check_relative(pattern)?;
        let full = ws.root.join(pattern).display().to_string();
        let paths = glob::glob(&full).map_err(|e| WorkerError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        let mut files: Vec<String> = paths
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .filter_map(|p| p.strip_prefix(&ws.root).ok().map(|r| r.display().to_string()))
            .collect();
        files.sort();
        Ok(files)
    }

    async fn discard(&self, ws: &Workspace) -> Result<(), WorkerError> {
        match tokio::fs::remove_dir_all(&ws.root).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;

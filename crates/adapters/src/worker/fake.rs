// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scriptable in-memory worker for tests.

use super::{check_relative, CommandOutput, Workspace, WorkerAdapter, WorkerError, WorkspaceRequest};
use async_trait::async_trait;
use cim_core::CommandSpec;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Recorded command execution
#[derive(Debug, Clone)]
pub struct ExecCall {
    pub workspace_id: String,
    pub job: String,
    pub platform: String,
    pub image: Option<String>,
    pub command: CommandSpec,
}

#[derive(Clone)]
struct Rule {
    platform: Option<String>,
    prefix: Vec<String>,
    output: Result<CommandOutput, String>,
    delay: Option<Duration>,
    writes: Option<(String, Vec<u8>)>,
}

impl Rule {
    fn matches(&self, ws: &Workspace, cmd: &CommandSpec) -> bool {
        let prefix: Vec<&str> = self.prefix.iter().map(String::as_str).collect();
        self.platform.as_ref().is_none_or(|p| *p == ws.platform) && cmd.starts_with(&prefix)
    }
}

#[derive(Default)]
struct FakeWorkerState {
    rules: Vec<Rule>,
    calls: Vec<ExecCall>,
    opened: Vec<Workspace>,
    discarded: Vec<String>,
    unavailable: HashSet<String>,
    files: BTreeMap<(String, String), Vec<u8>>,
    next_id: u64,
}

/// Fake worker adapter for testing.
///
/// Commands succeed with empty output unless a rule matches. Rules match on
/// an argv prefix and optionally a platform; the most recently added
/// matching rule wins.
#[derive(Clone, Default)]
pub struct FakeWorkerAdapter {
    inner: Arc<Mutex<FakeWorkerState>>,
}

impl FakeWorkerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, rule: Rule) -> &Self {
        self.inner.lock().rules.push(rule);
        self
    }

    /// Respond to commands starting with `prefix` on every platform.
    pub fn on(&self, prefix: &[&str], output: CommandOutput) -> &Self {
        self.push(Rule {
            platform: None,
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            output: Ok(output),
            delay: None,
            writes: None,
        })
    }

    /// Respond to commands starting with `prefix` on one platform.
    pub fn on_platform(&self, platform: &str, prefix: &[&str], output: CommandOutput) -> &Self {
        self.push(Rule {
            platform: Some(platform.to_string()),
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            output: Ok(output),
            delay: None,
            writes: None,
        })
    }

    /// Make matching commands fail to execute at all.
    pub fn exec_error(&self, prefix: &[&str], message: &str) -> &Self {
        self.push(Rule {
            platform: None,
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            output: Err(message.to_string()),
            delay: None,
            writes: None,
        })
    }

    /// Matching commands take `delay` (tokio time) before succeeding.
    pub fn delay(&self, prefix: &[&str], delay: Duration) -> &Self {
        self.push(Rule {
            platform: None,
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            output: Ok(CommandOutput::default()),
            delay: Some(delay),
            writes: None,
        })
    }

    /// Matching commands succeed and leave a file in the workspace.
    pub fn writes_file(&self, prefix: &[&str], path: &str, content: &[u8]) -> &Self {
        self.push(Rule {
            platform: None,
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            output: Ok(CommandOutput::default()),
            delay: None,
            writes: Some((path.to_string(), content.to_vec())),
        })
    }

    /// Refuse to open workspaces for `label`.
    pub fn set_unavailable(&self, label: &str) {
        self.inner.lock().unavailable.insert(label.to_string());
    }

    pub fn calls(&self) -> Vec<ExecCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded commands for one job, rendered for assertions.
    pub fn commands_for(&self, job: &str) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| c.job == job)
            .map(|c| c.command.argv().join(" "))
            .collect()
    }

    pub fn opened(&self) -> Vec<Workspace> {
        self.inner.lock().opened.clone()
    }

    pub fn discarded(&self) -> Vec<String> {
        self.inner.lock().discarded.clone()
    }

    /// File contents written into a workspace (by rules or `write_file`).
    pub fn file(&self, workspace_id: &str, path: &str) -> Option<Vec<u8>> {
        self.inner.lock().files.get(&(workspace_id.to_string(), path.to_string())).cloned()
    }
}

#[async_trait]
impl WorkerAdapter for FakeWorkerAdapter {
    async fn open(&self, request: WorkspaceRequest) -> Result<Workspace, WorkerError> {
        let mut state = self.inner.lock();
        if state.unavailable.contains(&request.label) {
            return Err(WorkerError::NoWorker(request.label));
        }
        state.next_id += 1;
        let id = format!("ws-{}", state.next_id);
        let ws = Workspace {
            root: PathBuf::from("/fake").join(&id),
            id,
            job: request.job,
            platform: request.platform,
            label: request.label,
            image: request.image,
        };
        state.opened.push(ws.clone());
        Ok(ws)
    }

    async fn exec(&self, ws: &Workspace, cmd: &CommandSpec) -> Result<CommandOutput, WorkerError> {
        let rule = {
            let mut state = self.inner.lock();
            state.calls.push(ExecCall {
                workspace_id: ws.id.clone(),
                job: ws.job.clone(),
                platform: ws.platform.clone(),
                image: ws.image.clone(),
                command: cmd.clone(),
            });
            state.rules.iter().rev().find(|r| r.matches(ws, cmd)).cloned()
        };
        let Some(rule) = rule else {
            return Ok(CommandOutput::default());
        };
        if let Some(delay) = rule.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((path, content)) = rule.writes {
            self.inner.lock().files.insert((ws.id.clone(), path), content);
        }
        rule.output.map_err(WorkerError::Exec)
    }

    async fn write_file(&self, ws: &Workspace, path: &str, content: &[u8]) -> Result<(), WorkerError> {
        check_relative(path)?;
        self.inner.lock().files.insert((ws.id.clone(), path.to_string()), content.to_vec());
        Ok(())
    }

    async fn read_file(&self, ws: &Workspace, path: &str) -> Result<Option<Vec<u8>>, WorkerError> {
        check_relative(path)?;
        Ok(self.inner.lock().files.get(&(ws.id.clone(), path.to_string())).cloned())
    }

    async fn list_files(&self, ws: &Workspace, pattern: &str) -> Result<Vec<String>, WorkerError> {
        let pattern = glob::Pattern::new(pattern).map_err(|e| WorkerError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(self
            .inner
            .lock()
            .files
            .keys()
            .filter(|(id, path)| *id == ws.id && pattern.matches(path))
            .map(|(_, path)| path.clone())
            .collect())
    }

    async fn discard(&self, ws: &Workspace) -> Result<(), WorkerError> {
        let mut state = self.inner.lock();
        state.discarded.push(ws.id.clone());
        state.files.retain(|(id, _), _| *id != ws.id);
        Ok(())
    }
}

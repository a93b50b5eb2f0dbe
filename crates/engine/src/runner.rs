// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job work: acquire a workspace, run the job's commands, then archive
//! logs and outcome records and release the workspace.

use crate::config::Conventions;
use crate::context::RunContext;
use crate::image::{ImageCache, ImageError};
use crate::shims::{plan_shims, Shims};
use crate::source::{SourceSpec, SOURCE_DIR};
use crate::windows::run_group;
use async_compression::tokio::write::XzEncoder;
use async_trait::async_trait;
use cim_adapters::{CommandOutput, RegistryAdapter, WorkerAdapter, WorkerError, Workspace, WorkspaceRequest};
use cim_core::{BranchInfo, CommandSpec, JobKind, JobSpec, Platform, PlatformRegistry, WorkGroup};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Transcript of every command a job ran, archived with the job's logs.
pub const CONSOLE_LOG: &str = "cim-console.log";

/// Lines of coverage output kept when the report marker is missing.
const COVERAGE_TAIL_LINES: usize = 20;
const COVERAGE_MARKER: &str = "Test Report Summary";
/// Lines of stderr carried in a command failure.
const STDERR_TAIL_LINES: usize = 20;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
    #[error("`{command}` exited with code {exit_code}: {stderr}")]
    CommandFailed { command: String, exit_code: i32, stderr: String },
    #[error("deadline of {} minutes exceeded", .0.as_secs() / 60)]
    Timeout(Duration),
    #[error("windows config `{config}` failed")]
    WindowsConfig {
        config: String,
        #[source]
        source: Box<JobError>,
    },
    #[error("no {0} command is configured")]
    NotConfigured(&'static str),
    #[error("job task panicked: {0}")]
    Panicked(String),
    #[error("failed to encode windows config: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Executes the body of one job.
///
/// `prepare` and `run` are bounded by the job's deadline; `finish` always
/// runs once `prepare` has succeeded, whether `run` returned, timed out or
/// panicked.
#[async_trait]
pub trait JobRunner: Send + Sync + 'static {
    type Prepared: Send + Sync + 'static;

    async fn prepare(&self, job: &JobSpec) -> Result<Self::Prepared, JobError>;

    async fn run(&self, job: &JobSpec, prepared: &Self::Prepared) -> Result<(), JobError>;

    async fn finish(&self, job: &JobSpec, prepared: &Self::Prepared);
}

/// A job's workspace and the transcript of commands run in it.
pub struct JobWorkspace {
    pub workspace: Workspace,
    transcript: Mutex<String>,
}

impl JobWorkspace {
    fn new(workspace: Workspace) -> Self {
        Self { workspace, transcript: Mutex::new(String::new()) }
    }

    fn record(&self, cmd: &CommandSpec, output: &CommandOutput) {
        let mut t = self.transcript.lock();
        t.push_str(&format!("$ {}\n", cmd));
        t.push_str(&output.stdout);
        t.push_str(&output.stderr);
        if output.exit_code != 0 {
            t.push_str(&format!("[exit {}]\n", output.exit_code));
        }
    }

    pub fn transcript(&self) -> String {
        self.transcript.lock().clone()
    }
}

/// Runs jobs on real or fake workers through the adapter traits.
pub struct StandardRunner<W: WorkerAdapter, R: RegistryAdapter> {
    worker: W,
    images: Arc<ImageCache<R>>,
    platforms: Arc<PlatformRegistry>,
    branch: Arc<BranchInfo>,
    source: SourceSpec,
    conventions: Arc<Conventions>,
    artifacts: PathBuf,
    ctx: Arc<RunContext>,
}

impl<W: WorkerAdapter, R: RegistryAdapter> StandardRunner<W, R> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        worker: W,
        images: Arc<ImageCache<R>>,
        platforms: Arc<PlatformRegistry>,
        branch: Arc<BranchInfo>,
        source: SourceSpec,
        conventions: Arc<Conventions>,
        artifacts: impl Into<PathBuf>,
        ctx: Arc<RunContext>,
    ) -> Self {
        Self { worker, images, platforms, branch, source, conventions, artifacts: artifacts.into(), ctx }
    }

    pub fn artifacts(&self) -> &Path {
        &self.artifacts
    }

    fn platform(&self, name: &str) -> Result<&Platform, JobError> {
        self.platforms.get(name).ok_or_else(|| JobError::UnknownPlatform(name.to_string()))
    }

    /// Open a workspace for `job` on `platform`, inside its image when it has one.
    pub async fn open(&self, job: &str, platform: &Platform) -> Result<JobWorkspace, JobError> {
        let image = if platform.has_container_runtime {
            Some(self.images.resolve_or_build(platform).await?.reference)
        } else {
            None
        };
        let ws = self
            .worker
            .open(WorkspaceRequest {
                job: job.to_string(),
                platform: platform.name.clone(),
                label: platform.label.clone(),
                image,
            })
            .await?;
        tracing::debug!(%job, workspace = %ws.id, "opened workspace");
        Ok(JobWorkspace::new(ws))
    }

    /// Check out the source and install the platform's shims.
    pub async fn setup(&self, jw: &JobWorkspace, platform: &Platform) -> Result<Shims, JobError> {
        for cmd in self.source.checkout_commands() {
            self.exec(jw, &cmd, &IndexMap::new()).await?;
        }
        let root = jw.workspace.root.display().to_string();
        let shims = plan_shims(platform, &self.branch, &self.conventions.pinning_tool, &root);
        for file in &shims.files {
            self.write_file(jw, &file.path, &file.content).await?;
        }
        for cmd in &shims.commands {
            self.exec(jw, cmd, &shims.env).await?;
        }
        Ok(shims)
    }

    /// Run `cmd` with `env` as its base environment; a non-zero exit is an error.
    pub async fn exec(
        &self,
        jw: &JobWorkspace,
        cmd: &CommandSpec,
        env: &IndexMap<String, String>,
    ) -> Result<CommandOutput, JobError> {
        let cmd = cmd.clone().with_base_env(env);
        tracing::debug!(job = %jw.workspace.job, command = %cmd, "exec");
        let output = self.worker.exec(&jw.workspace, &cmd).await?;
        jw.record(&cmd, &output);
        if !output.success() {
            return Err(JobError::CommandFailed {
                command: cmd.to_string(),
                exit_code: output.exit_code,
                stderr: tail(&output.stderr, STDERR_TAIL_LINES),
            });
        }
        Ok(output)
    }

    pub async fn write_file(&self, jw: &JobWorkspace, path: &str, content: &[u8]) -> Result<(), JobError> {
        self.worker.write_file(&jw.workspace, path, content).await?;
        Ok(())
    }

    pub async fn release(&self, jw: &JobWorkspace) {
        if let Err(e) = self.worker.discard(&jw.workspace).await {
            tracing::warn!(job = %jw.workspace.job, error = %e, "failed to discard workspace");
        }
    }

    fn in_source(program: &[String], what: &'static str) -> Result<CommandSpec, JobError> {
        let (program, args) = program.split_first().ok_or(JobError::NotConfigured(what))?;
        Ok(CommandSpec::new(program).args(args.iter().cloned()).cwd(SOURCE_DIR))
    }

    async fn run_component(
        &self,
        job: &JobSpec,
        jw: &JobWorkspace,
        env: &IndexMap<String, String>,
        component: &str,
        seed: u32,
    ) -> Result<(), JobError> {
        let cmd = CommandSpec::new(&self.conventions.driver)
            .args(["--seed", seed.to_string().as_str(), "--keep-going", component])
            .env(&self.conventions.outcome_env_var, format!("../{}", job.outcome_file_name()))
            .cwd(SOURCE_DIR);
        self.exec(jw, &cmd, env).await?;
        Ok(())
    }

    async fn run_basic(
        &self,
        jw: &JobWorkspace,
        env: &IndexMap<String, String>,
        compiler: &str,
    ) -> Result<(), JobError> {
        let mut env = env.clone();
        env.entry("CC".to_string()).or_insert_with(|| compiler.to_string());
        self.exec(jw, &CommandSpec::new("make").cwd(SOURCE_DIR), &env).await?;
        self.exec(jw, &CommandSpec::new("make").arg("check").cwd(SOURCE_DIR), &env).await?;
        Ok(())
    }

    async fn run_windows(
        &self,
        jw: &JobWorkspace,
        env: &IndexMap<String, String>,
        group: &WorkGroup,
    ) -> Result<(), JobError> {
        let (program, args) =
            self.conventions.windows_command.split_first().ok_or(JobError::NotConfigured("windows"))?;
        run_group(group, |i, config| {
            let config = config.clone();
            async move {
                let result: Result<(), JobError> = async {
                    let file = format!("windows-config-{}.json", i);
                    self.write_file(jw, &file, &serde_json::to_vec_pretty(&config)?).await?;
                    let cmd = CommandSpec::new(program)
                        .args(args.iter().cloned())
                        .args([SOURCE_DIR.to_string(), format!("logs/{}", i), file]);
                    self.exec(jw, &cmd, env).await.map(|_| ())
                }
                .await;
                result.map_err(|e| JobError::WindowsConfig { config: config.to_string(), source: Box::new(e) })
            }
        })
        .await
    }

    async fn run_coverage(&self, jw: &JobWorkspace, env: &IndexMap<String, String>) -> Result<(), JobError> {
        let cmd = Self::in_source(&self.conventions.coverage_command, "coverage")?;
        let output = self.exec(jw, &cmd, env).await?;
        self.ctx.set_coverage_summary(coverage_excerpt(&output.stdout));
        Ok(())
    }

    async fn run_interface_stability(
        &self,
        jw: &JobWorkspace,
        env: &IndexMap<String, String>,
        base_ref: &str,
    ) -> Result<(), JobError> {
        let cmd = Self::in_source(&self.conventions.interface_command, "interface")?;
        self.exec(jw, &cmd.args(["-o", base_ref, "-n", "HEAD"]), env).await?;
        Ok(())
    }

    async fn run_external_scan(&self, jw: &JobWorkspace, env: &IndexMap<String, String>) -> Result<(), JobError> {
        let scan = Self::in_source(&self.conventions.scan_command, "scan")?;
        self.exec(jw, &scan.arg("make"), env).await?;
        let archive = CommandSpec::new("tar").args(["-czf", "cov-int.tgz", "cov-int"]).cwd(SOURCE_DIR);
        self.exec(jw, &archive, env).await?;
        if let Some(upload) = self.conventions.scan_upload.as_deref() {
            self.exec(jw, &Self::in_source(upload, "scan upload")?, env).await?;
        }
        Ok(())
    }

    async fn archive_logs(&self, job: &JobSpec, jw: &JobWorkspace) -> Result<(), JobError> {
        for path in self.worker.list_files(&jw.workspace, "**/*.log").await? {
            let Some(content) = self.worker.read_file(&jw.workspace, &path).await? else {
                continue;
            };
            let dest = self.artifacts.join(format!("{}-{}.xz", job.name, path.replace('/', "-")));
            write_xz(&dest, &content).await.map_err(WorkerError::Io)?;
        }
        Ok(())
    }

    async fn persist_outcomes(&self, job: &JobSpec, jw: &JobWorkspace) -> Result<(), JobError> {
        let name = job.outcome_file_name();
        let Some(content) = self.worker.read_file(&jw.workspace, &name).await? else {
            tracing::warn!(job = %job.name, "component job left no outcome file");
            return Ok(());
        };
        let dest = self.artifacts.join(&name);
        tokio::fs::create_dir_all(&self.artifacts).await.map_err(WorkerError::Io)?;
        tokio::fs::write(&dest, content).await.map_err(WorkerError::Io)?;
        self.ctx.add_outcome_file(dest);
        Ok(())
    }
}

#[async_trait]
impl<W: WorkerAdapter, R: RegistryAdapter> JobRunner for StandardRunner<W, R> {
    type Prepared = JobWorkspace;

    async fn prepare(&self, job: &JobSpec) -> Result<JobWorkspace, JobError> {
        let platform = self.platform(&job.platform)?;
        self.open(&job.name, platform).await
    }

    async fn run(&self, job: &JobSpec, jw: &JobWorkspace) -> Result<(), JobError> {
        let platform = self.platform(&job.platform)?;
        let shims = self.setup(jw, platform).await?;
        let env = &shims.env;
        match &job.kind {
            JobKind::Component { component, seed } => self.run_component(job, jw, env, component, *seed).await,
            JobKind::Basic { compiler } => self.run_basic(jw, env, compiler).await,
            JobKind::Windows { group } => self.run_windows(jw, env, group).await,
            JobKind::Coverage => self.run_coverage(jw, env).await,
            JobKind::InterfaceStability { base_ref } => self.run_interface_stability(jw, env, base_ref).await,
            JobKind::ExternalScan => self.run_external_scan(jw, env).await,
        }
    }

    async fn finish(&self, job: &JobSpec, jw: &JobWorkspace) {
        if let Err(e) = self.worker.write_file(&jw.workspace, CONSOLE_LOG, jw.transcript().as_bytes()).await {
            tracing::warn!(job = %job.name, error = %e, "failed to write console log");
        }
        if let Err(e) = self.archive_logs(job, jw).await {
            tracing::warn!(job = %job.name, error = %e, "failed to archive logs");
        }
        if job.produces_outcomes() {
            if let Err(e) = self.persist_outcomes(job, jw).await {
                tracing::warn!(job = %job.name, error = %e, "failed to persist outcome file");
            }
        }
        self.release(jw).await;
    }
}

async fn write_xz(dest: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let file = tokio::fs::File::create(dest).await?;
    let mut encoder = XzEncoder::new(file);
    encoder.write_all(content).await?;
    encoder.shutdown().await?;
    Ok(())
}

/// The coverage report summary, or the tail of the output without one.
pub fn coverage_excerpt(stdout: &str) -> String {
    match stdout.find(COVERAGE_MARKER) {
        Some(start) => stdout[start..].trim_end().to_string(),
        None => tail(stdout, COVERAGE_TAIL_LINES),
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.trim_end().lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

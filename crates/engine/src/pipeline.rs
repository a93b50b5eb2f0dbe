// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end run: introspect, plan, execute, analyze, report.

use crate::analysis::{merge_outcomes, run_analysis, AnalysisError, AnalysisVerdict, FinalReport, MERGED_OUTCOMES};
use crate::config::Conventions;
use crate::context::RunContext;
use crate::execute::Engine;
use crate::graph::{build_jobs, GraphError};
use crate::image::ImageCache;
use crate::introspect::{Introspector, PreflightError};
use crate::report::Reporter;
use crate::runner::StandardRunner;
use crate::source::SourceSpec;
use cim_adapters::{MailAdapter, RegistryAdapter, StatusAdapter, WorkerAdapter};
use cim_core::{CommitState, OutcomeCounts, PlatformRegistry, RunPlan};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Machine-readable copy of the final report, in the artifacts directory.
pub const REPORT_FILE: &str = "cim-report.json";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pre-flight check failed: {0}")]
    Preflight(#[from] PreflightError),
    #[error("cannot build job graph: {0}")]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub plan: RunPlan,
    pub source: SourceSpec,
    pub artifacts: PathBuf,
    /// Jobs in flight at once; zero is unbounded
    pub max_parallel: usize,
}

pub struct Pipeline<W: WorkerAdapter, R: RegistryAdapter, S: StatusAdapter, M: MailAdapter> {
    worker: W,
    images: Arc<ImageCache<R>>,
    platforms: Arc<PlatformRegistry>,
    conventions: Arc<Conventions>,
    reporter: Arc<Reporter<S, M>>,
    config: PipelineConfig,
}

impl<W, R, S, M> Pipeline<W, R, S, M>
where
    W: WorkerAdapter,
    R: RegistryAdapter,
    S: StatusAdapter,
    M: MailAdapter,
{
    pub fn new(
        worker: W,
        images: Arc<ImageCache<R>>,
        platforms: Arc<PlatformRegistry>,
        conventions: Arc<Conventions>,
        reporter: Arc<Reporter<S, M>>,
        config: PipelineConfig,
    ) -> Self {
        Self { worker, images, platforms, conventions, reporter, config }
    }

    pub async fn run(&self) -> Result<FinalReport, PipelineError> {
        let plan = &self.config.plan;
        tracing::info!(mode = %plan.mode, revision = %self.config.source.revision, "pipeline started");
        self.reporter.notify(CommitState::Pending, "In progress", None).await;

        let introspector = Introspector::new(
            self.worker.clone(),
            Arc::clone(&self.images),
            Arc::clone(&self.platforms),
            Arc::clone(&self.conventions),
        );
        let branch = match introspector.discover(&self.config.source).await {
            Ok(branch) => branch,
            Err(e) => return Err(self.abort(e.into()).await),
        };
        let graph = match build_jobs(&branch, plan, &self.platforms) {
            Ok(graph) => graph,
            Err(e) => return Err(self.abort(e.into()).await),
        };
        let jobs = graph.len();

        let ctx = Arc::new(RunContext::new());
        let runner = Arc::new(StandardRunner::new(
            self.worker.clone(),
            Arc::clone(&self.images),
            Arc::clone(&self.platforms),
            Arc::new(branch),
            self.config.source.clone(),
            Arc::clone(&self.conventions),
            self.config.artifacts.clone(),
            Arc::clone(&ctx),
        ));
        let engine = Engine::new(Arc::clone(&runner), Arc::clone(&self.reporter), Arc::clone(&ctx))
            .max_parallel(self.config.max_parallel);
        if let Err(e) = engine.execute(graph).await {
            tracing::warn!(error = %e, "continuing to result analysis");
        }

        let merged = merge_outcomes(&ctx.outcome_files(), &self.config.artifacts.join(MERGED_OUTCOMES)).await?;
        let outcomes = OutcomeCounts::tally(&String::from_utf8_lossy(&merged));
        let analysis = match self.platforms.component_platforms().first() {
            Some(platform) => run_analysis(&runner, platform, &merged, &self.conventions.analysis_command).await,
            None => AnalysisVerdict::Skipped,
        };

        let report = FinalReport {
            jobs,
            failed_jobs: ctx.failed_jobs(),
            outcomes,
            coverage_summary: ctx.coverage_summary(),
            analysis,
        };
        self.write_report(&report).await?;
        self.reporter.send_summary(&report).await;
        let state = if report.passed() { CommitState::Success } else { CommitState::Failure };
        self.reporter.notify(state, &report.description(), None).await;
        tracing::info!(passed = report.passed(), jobs, failed = report.failed_jobs.len(), "pipeline finished");
        Ok(report)
    }

    async fn abort(&self, error: PipelineError) -> PipelineError {
        tracing::error!(error = %error, "aborting before any job starts");
        self.reporter.notify(CommitState::Failure, &error.to_string(), None).await;
        error
    }

    async fn write_report(&self, report: &FinalReport) -> Result<(), AnalysisError> {
        let path = self.config.artifacts.join(REPORT_FILE);
        let write_err = |source| AnalysisError::Write { path: path.display().to_string(), source };
        let json = serde_json::to_vec_pretty(report).map_err(|e| write_err(std::io::Error::other(e)))?;
        tokio::fs::write(&path, json).await.map_err(write_err)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

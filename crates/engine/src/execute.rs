// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parallel execution of a job graph.
//!
//! Every job runs as its own task. A failing job never cancels its siblings:
//! the failure is recorded in the run context, the first one is reported as
//! a failure status, and the run fails once all jobs have finished.

use crate::context::RunContext;
use crate::graph::JobGraph;
use crate::report::Reporter;
use crate::runner::{JobError, JobRunner};
use cim_adapters::{MailAdapter, StatusAdapter};
use cim_core::{CommitState, JobSpec};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecuteError {
    #[error("{} job(s) failed: {}", .0.len(), .0.join(", "))]
    JobsFailed(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub jobs: usize,
}

pub struct Engine<J: JobRunner, S: StatusAdapter, M: MailAdapter> {
    runner: Arc<J>,
    reporter: Arc<Reporter<S, M>>,
    ctx: Arc<RunContext>,
    limit: Option<Arc<Semaphore>>,
}

impl<J: JobRunner, S: StatusAdapter, M: MailAdapter> Engine<J, S, M> {
    pub fn new(runner: Arc<J>, reporter: Arc<Reporter<S, M>>, ctx: Arc<RunContext>) -> Self {
        Self { runner, reporter, ctx, limit: None }
    }

    /// Bound the number of jobs in flight. Zero means unbounded.
    pub fn max_parallel(mut self, jobs: usize) -> Self {
        self.limit = (jobs > 0).then(|| Arc::new(Semaphore::new(jobs)));
        self
    }

    pub async fn execute(&self, graph: JobGraph) -> Result<RunSummary, ExecuteError> {
        let total = graph.len();
        tracing::info!(jobs = total, "starting jobs");

        let mut set = JoinSet::new();
        for (name, job) in graph {
            let runner = Arc::clone(&self.runner);
            let limit = self.limit.clone();
            set.spawn(async move {
                let _permit = match limit {
                    Some(limit) => limit.acquire_owned().await.ok(),
                    None => None,
                };
                let result = run_job(runner, Arc::new(job)).await;
                (name, result)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((name, Ok(()))) => tracing::info!(job = %name, "job passed"),
                Ok((name, Err(e))) => self.job_failed(&name, &e).await,
                Err(e) => tracing::error!(error = %e, "job supervisor task failed"),
            }
        }

        let failed = self.ctx.failed_jobs();
        if failed.is_empty() {
            tracing::info!(jobs = total, "all jobs passed");
            Ok(RunSummary { jobs: total })
        } else {
            tracing::error!(failed = failed.len(), jobs = total, "jobs failed");
            Err(ExecuteError::JobsFailed(failed))
        }
    }

    async fn job_failed(&self, name: &str, error: &JobError) {
        tracing::error!(job = %name, error = %error_chain(error), "job failed");
        if self.ctx.record_failure(name) {
            self.reporter.notify(CommitState::Failure, &format!("Failures: {}", name), None).await;
        }
    }
}

async fn run_job<J: JobRunner>(runner: Arc<J>, job: Arc<JobSpec>) -> Result<(), JobError> {
    let deadline = Instant::now() + job.deadline();
    tracing::info!(job = %job.name, platform = %job.platform, class = %job.class(), "job started");

    let prepared = isolate({
        let (runner, job) = (Arc::clone(&runner), Arc::clone(&job));
        async move {
            timeout_at(deadline, runner.prepare(&job))
                .await
                .map_err(|_| JobError::Timeout(job.deadline()))?
        }
    })
    .await?;
    let prepared = Arc::new(prepared);

    let result = isolate({
        let (runner, job, prepared) = (Arc::clone(&runner), Arc::clone(&job), Arc::clone(&prepared));
        async move {
            timeout_at(deadline, runner.run(&job, &prepared))
                .await
                .unwrap_or(Err(JobError::Timeout(job.deadline())))
        }
    })
    .await;

    let cleanup = isolate({
        let job = Arc::clone(&job);
        async move {
            runner.finish(&job, &prepared).await;
            Ok(())
        }
    })
    .await;
    if let Err(e) = cleanup {
        tracing::error!(job = %job.name, error = %e, "job cleanup failed");
    }
    result
}

/// Runs one phase as its own task so a panic becomes this job's failure.
async fn isolate<T, F>(phase: F) -> Result<T, JobError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, JobError>> + Send + 'static,
{
    tokio::spawn(phase).await.unwrap_or_else(|e| Err(JobError::Panicked(panic_message(e))))
}

fn panic_message(e: tokio::task::JoinError) -> String {
    if !e.is_panic() {
        return "cancelled".to_string();
    }
    let payload = e.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// `error: cause: cause` for an error and its sources.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
#[path = "execute_tests.rs"]
mod tests;

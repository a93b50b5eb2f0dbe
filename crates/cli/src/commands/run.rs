// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cim run`: the full pipeline against local workers.

use crate::env;
use crate::exit_error::{ExitError, JOBS_FAILED, PREFLIGHT_ABORT};
use crate::output::render_report;
use cim_adapters::{
    DockerRegistryAdapter, GithubStatusAdapter, LocalWorkerAdapter, RegistryCredentials,
    SendmailAdapter,
};
use cim_core::{RunMode, RunPlan, DEFAULT_SEED};
use cim_engine::{
    BuildDefinitions, CiInstance, ImageCache, Pipeline, PipelineConfig, PipelineError, ReportConfig,
    Reporter, SourceSpec,
};
use clap::Args;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Repository to test
    #[arg(long, env = "CIM_REPO_URL")]
    pub repo: String,
    /// Commit to test
    #[arg(long, env = "CIM_REVISION")]
    pub revision: String,
    #[arg(long, env = "CIM_RUN_MODE", default_value = "pr-head")]
    pub mode: RunMode,
    /// Branch name used in the summary email
    #[arg(long, env = "BRANCH_NAME", default_value = "development")]
    pub branch: String,
    /// Reference the interface-stability check compares against
    #[arg(long, env = "CIM_BASE_REF", default_value = "origin/development")]
    pub base_ref: String,
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u32,

    /// Platform registry (TOML); the built-in table when omitted
    #[arg(long, env = "CIM_PLATFORMS")]
    pub platforms: Option<PathBuf>,
    /// Branch conventions (TOML)
    #[arg(long, env = "CIM_CONVENTIONS")]
    pub conventions: Option<PathBuf>,
    /// Directory holding one `<platform>/Dockerfile` per container platform
    #[arg(long, env = "CIM_DOCKERFILES", default_value = "resources/docker_files")]
    pub dockerfiles: PathBuf,
    #[arg(long, env = "CIM_IMAGE_REPOSITORY", default_value = "cim/ci")]
    pub image_repository: String,
    /// Rebuild and push images even when the tag exists
    #[arg(long)]
    pub overwrite_images: bool,
    #[arg(long, env = "CIM_REGISTRY_SERVER")]
    pub registry_server: Option<String>,
    #[arg(long, env = "CIM_REGISTRY_USER")]
    pub registry_user: Option<String>,

    /// Worker labels served locally; every platform's label when omitted
    #[arg(long = "label")]
    pub labels: Vec<String>,
    /// Jobs in flight at once; zero is unbounded
    #[arg(long, default_value_t = 0)]
    pub max_parallel: usize,
    #[arg(long, env = "CIM_ARTIFACTS_DIR", default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Head commit of the change request; enables status reporting
    #[arg(long, env = "CIM_CHANGE_SHA")]
    pub change: Option<String>,
    /// `owner/name` of the repository receiving statuses
    #[arg(long, env = "CIM_STATUS_REPO")]
    pub status_repo: Option<String>,
    #[arg(long, env = "CIM_STATUS_API", default_value = "https://api.github.com")]
    pub status_api: String,
    #[arg(long, env = "CIM_INSTANCE", default_value = "open-ci")]
    pub ci: CiInstance,
    /// Link attached to every status
    #[arg(long, env = "BUILD_URL")]
    pub target_url: Option<String>,

    /// Summary email recipients
    #[arg(long = "email", env = "CIM_EMAIL_RECIPIENTS", value_delimiter = ',')]
    pub recipients: Vec<String>,
    #[arg(long, env = "CIM_EMAIL_FROM")]
    pub email_from: Option<String>,
    #[arg(long, default_value = "sendmail")]
    pub sendmail: String,
}

pub async fn handle(args: RunArgs) -> anyhow::Result<()> {
    if args.change.is_some() && args.status_repo.is_none() {
        return Err(ExitError::config("--change requires --status-repo").into());
    }
    let platforms = Arc::new(super::load_platforms(args.platforms.as_deref())?);
    let conventions = Arc::new(super::load_conventions(args.conventions.as_deref())?);
    let plan = RunPlan::new(args.mode)
        .switches(env::run_switches()?)
        .seed(args.seed)
        .base_ref(args.base_ref);

    let credentials = match (args.registry_server, args.registry_user, env::registry_password()) {
        (Some(server), Some(username), Some(password)) => {
            Some(RegistryCredentials { server, username, password })
        }
        _ => None,
    };
    let registry = DockerRegistryAdapter::new().credentials(credentials);
    let images = Arc::new(
        ImageCache::new(registry, args.image_repository, BuildDefinitions::new(args.dockerfiles))
            .overwrite(args.overwrite_images),
    );

    let labels = if args.labels.is_empty() {
        platforms.iter().map(|p| p.label.clone()).collect::<BTreeSet<_>>().into_iter().collect()
    } else {
        args.labels
    };
    let worker = LocalWorkerAdapter::new(env::work_dir(), labels);

    let status = GithubStatusAdapter::new(
        args.status_api,
        args.status_repo.unwrap_or_default(),
        env::status_token(),
    );
    let mail = SendmailAdapter::new(args.sendmail);
    let mut report_config = ReportConfig::new(args.branch)
        .ci(args.ci)
        .merge(args.mode == RunMode::PrMerge)
        .recipients(args.recipients);
    if let Some(change) = args.change {
        report_config = report_config.change(change);
    }
    if let Some(url) = args.target_url {
        report_config = report_config.target_url(url);
    }
    if let Some(from) = args.email_from {
        report_config = report_config.from(from);
    }
    let reporter = Arc::new(Reporter::new(status, mail, report_config));

    let config = PipelineConfig {
        plan,
        source: SourceSpec::new(args.repo, args.revision),
        artifacts: args.artifacts,
        max_parallel: args.max_parallel,
    };
    tracing::info!(repo = %config.source.url, revision = %config.source.revision, "starting run");
    let pipeline = Pipeline::new(worker, images, platforms, conventions, reporter, config);

    match pipeline.run().await {
        Ok(report) => {
            print!("{}", render_report(&report));
            if report.passed() {
                Ok(())
            } else {
                Err(ExitError::new(JOBS_FAILED, report.description()).into())
            }
        }
        Err(e @ PipelineError::Preflight(_)) => Err(ExitError::new(PREFLIGHT_ABORT, e.to_string()).into()),
        Err(e @ PipelineError::Graph(_)) => Err(ExitError::config(e.to_string()).into()),
        Err(e) => Err(e.into()),
    }
}

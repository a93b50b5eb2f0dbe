// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Branch introspection: which components exist and where they can run.
//!
//! Component platforms are probed one at a time in registry priority
//! order. The first platform also seeds the full component list and the
//! branch's feature flags; every platform then claims the still-unassigned
//! components it can run. Earlier platforms win ties, so the result is
//! independent of probe timing.

use crate::assign::verify_full_coverage;
use crate::config::Conventions;
use crate::image::{ImageCache, ImageError};
use crate::source::{in_source, SourceSpec, SOURCE_DIR};
use cim_adapters::{CommandOutput, RegistryAdapter, WorkerAdapter, WorkerError, Workspace, WorkspaceRequest};
use cim_core::{BranchInfo, CommandSpec, Platform, PlatformRegistry};
use std::sync::Arc;
use thiserror::Error;

/// Errors that stop a run before any job is scheduled.
#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("test driver on {platform} does not support component listing; rebase required")]
    BranchOutOfDate { platform: String },
    #[error("components with no capable platform: {}", .0.join(", "))]
    UnassignedComponents(Vec<String>),
    #[error("no platform can list components")]
    NoComponentPlatforms,
    #[error("`{command}` failed on {platform} (exit {exit_code}): {stderr}")]
    Probe { platform: String, command: String, exit_code: i32, stderr: String },
    #[error("probe on {platform}: {source}")]
    Worker { platform: String, source: WorkerError },
    #[error("probe on {platform}: {source}")]
    Image { platform: String, source: ImageError },
}

/// Parse the driver's component listing: one per line, blanks ignored.
pub fn parse_component_list(stdout: &str) -> Vec<String> {
    stdout.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect()
}

/// Probes component platforms to build the run's [`BranchInfo`].
pub struct Introspector<W: WorkerAdapter, R: RegistryAdapter> {
    worker: W,
    images: Arc<ImageCache<R>>,
    platforms: Arc<PlatformRegistry>,
    conventions: Arc<Conventions>,
}

impl<W: WorkerAdapter, R: RegistryAdapter> Introspector<W, R> {
    pub fn new(
        worker: W,
        images: Arc<ImageCache<R>>,
        platforms: Arc<PlatformRegistry>,
        conventions: Arc<Conventions>,
    ) -> Self {
        Self { worker, images, platforms, conventions }
    }

    /// Discover components, assign them, and run the pre-flight check.
    pub async fn discover(&self, source: &SourceSpec) -> Result<BranchInfo, PreflightError> {
        let platforms = self.platforms.component_platforms();
        if platforms.is_empty() {
            return Err(PreflightError::NoComponentPlatforms);
        }

        let mut branch = BranchInfo::new();
        for (i, platform) in platforms.into_iter().enumerate() {
            let ws = self.open(platform).await?;
            let result = self.probe(&ws, platform, source, i == 0, &mut branch).await;
            if let Err(e) = self.worker.discard(&ws).await {
                tracing::warn!(platform = %platform.name, error = %e, "failed to discard probe workspace");
            }
            result?;
        }

        for (component, platform) in &self.conventions.static_overrides {
            if branch.force_assign(component, platform) {
                tracing::info!(%component, %platform, "static platform override");
            }
        }
        if branch.supports_pinned_requirements {
            branch.requirements_override = self.conventions.requirements_override.clone();
        }

        verify_full_coverage(&branch)?;
        tracing::info!(
            components = branch.component_platform_map.len(),
            pinned = branch.supports_pinned_requirements,
            legacy = branch.legacy_language_mode,
            "branch introspection complete"
        );
        Ok(branch)
    }

    async fn open(&self, platform: &Platform) -> Result<Workspace, PreflightError> {
        let image = if platform.has_container_runtime {
            let image = self.images.resolve_or_build(platform).await.map_err(|source| {
                PreflightError::Image { platform: platform.name.clone(), source }
            })?;
            Some(image.reference)
        } else {
            None
        };
        let request = WorkspaceRequest {
            job: format!("introspect-{}", platform.name),
            platform: platform.name.clone(),
            label: platform.label.clone(),
            image,
        };
        self.worker.open(request).await.map_err(|source| worker_error(platform, source))
    }

    async fn probe(
        &self,
        ws: &Workspace,
        platform: &Platform,
        source: &SourceSpec,
        first: bool,
        branch: &mut BranchInfo,
    ) -> Result<(), PreflightError> {
        for cmd in source.checkout_commands() {
            self.run(ws, platform, &cmd).await?;
        }

        let help = self.exec(ws, platform, &self.driver(&["--help"])).await?;
        if !help.stdout.contains(&self.conventions.help_marker) {
            return Err(PreflightError::BranchOutOfDate { platform: platform.name.clone() });
        }

        if first {
            branch.supports_pinned_requirements =
                self.read(ws, platform, &in_source(&self.conventions.pinning_tool)).await?.is_some();
            branch.legacy_language_mode = self
                .read(ws, platform, &in_source(&self.conventions.legacy_build_file))
                .await?
                .is_some_and(|text| {
                    String::from_utf8_lossy(&text).contains(&self.conventions.legacy_marker)
                });
            let all = self.run(ws, platform, &self.driver(&["--list-all-components"])).await?;
            branch.seed_components(parse_component_list(&all.stdout));
        }

        let available = self.run(ws, platform, &self.driver(&["--list-components"])).await?;
        let available = parse_component_list(&available.stdout);
        for component in available.iter().filter(|c| !branch.has_component(c)) {
            tracing::warn!(platform = %platform.name, %component, "listed component was not in the full list");
        }
        let assigned = branch.assign_available(&platform.name, &available);
        tracing::info!(platform = %platform.name, assigned = assigned.len(), "claimed components");
        Ok(())
    }

    fn driver(&self, args: &[&str]) -> CommandSpec {
        CommandSpec::new(&self.conventions.driver).args(args.iter().copied()).cwd(SOURCE_DIR)
    }

    async fn exec(
        &self,
        ws: &Workspace,
        platform: &Platform,
        cmd: &CommandSpec,
    ) -> Result<CommandOutput, PreflightError> {
        self.worker.exec(ws, cmd).await.map_err(|source| worker_error(platform, source))
    }

    /// Like `exec`, but a non-zero exit is an error.
    async fn run(
        &self,
        ws: &Workspace,
        platform: &Platform,
        cmd: &CommandSpec,
    ) -> Result<CommandOutput, PreflightError> {
        let output = self.exec(ws, platform, cmd).await?;
        if !output.success() {
            return Err(PreflightError::Probe {
                platform: platform.name.clone(),
                command: cmd.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }

    async fn read(
        &self,
        ws: &Workspace,
        platform: &Platform,
        path: &str,
    ) -> Result<Option<Vec<u8>>, PreflightError> {
        self.worker.read_file(ws, path).await.map_err(|source| worker_error(platform, source))
    }
}

fn worker_error(platform: &Platform, source: WorkerError) -> PreflightError {
    PreflightError::Worker { platform: platform.name.clone(), source }
}

#[cfg(test)]
#[path = "introspect_tests.rs"]
mod tests;

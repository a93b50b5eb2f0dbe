// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job graph builder: the full set of jobs for a run.

use crate::windows::{toolchains, work_groups};
use cim_core::{BranchInfo, JobKind, JobSpec, OsFamily, PlatformRegistry, RunPlan};
use indexmap::IndexMap;
use thiserror::Error;

/// Jobs keyed by unique name, in generation order.
pub type JobGraph = IndexMap<String, JobSpec>;

/// Compilers for the plain make builds on each Linux platform.
pub const BASIC_COMPILERS: &[&str] = &["gcc", "clang"];

/// Components run on FreeBSD when the branch has them.
pub const FREEBSD_COMPONENTS: &[&str] = &["test_clang_opt", "test_gcc_opt", "check_generated_files"];

pub const COVERAGE_JOB: &str = "code-coverage";
pub const INTERFACE_STABILITY_JOB: &str = "interface-stability";
pub const EXTERNAL_SCAN_JOB: &str = "external-scan";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("duplicate job name: {0}")]
    DuplicateJob(String),
    #[error("component {component} is assigned to unknown platform {platform}")]
    UnknownPlatform { component: String, platform: String },
    #[error("component {0} has no platform")]
    Unassigned(String),
    #[error("no {0} platform is configured")]
    MissingFamily(OsFamily),
}

struct Builder {
    graph: JobGraph,
}

impl Builder {
    fn add(&mut self, job: JobSpec) -> Result<(), GraphError> {
        if self.graph.contains_key(&job.name) {
            return Err(GraphError::DuplicateJob(job.name));
        }
        self.graph.insert(job.name.clone(), job);
        Ok(())
    }
}

fn platform_of(platforms: &PlatformRegistry, family: OsFamily) -> Result<String, GraphError> {
    platforms.first_of(family).map(|p| p.name.clone()).ok_or(GraphError::MissingFamily(family))
}

/// Build every job enabled by `plan` for `branch`.
///
/// `branch` must be fully assigned (see `verify_full_coverage`).
pub fn build_jobs(
    branch: &BranchInfo,
    plan: &RunPlan,
    platforms: &PlatformRegistry,
) -> Result<JobGraph, GraphError> {
    let mut b = Builder { graph: JobGraph::new() };

    if plan.runs_components() {
        for (component, platform) in &branch.component_platform_map {
            let Some(platform) = platform else {
                return Err(GraphError::Unassigned(component.clone()));
            };
            if platforms.get(platform).is_none() {
                return Err(GraphError::UnknownPlatform {
                    component: component.clone(),
                    platform: platform.clone(),
                });
            }
            b.add(JobSpec::new(
                format!("all_sh-{}-{}", platform, component),
                platform.as_str(),
                JobKind::Component { component: component.clone(), seed: plan.seed },
            ))?;
        }
        for platform in platforms.by_family(OsFamily::LinuxContainer) {
            for compiler in BASIC_COMPILERS {
                b.add(JobSpec::new(
                    format!("std-make-{}-{}", compiler, platform.name),
                    platform.name.as_str(),
                    JobKind::Basic { compiler: compiler.to_string() },
                ))?;
            }
        }
    }

    if plan.runs_freebsd() {
        let freebsd = platform_of(platforms, OsFamily::FreeBsd)?;
        for component in FREEBSD_COMPONENTS.iter().filter(|c| branch.has_component(c)) {
            b.add(JobSpec::new(
                format!("all_sh-{}-{}", freebsd, component),
                freebsd.as_str(),
                JobKind::Component { component: component.to_string(), seed: plan.seed },
            ))?;
        }
        b.add(JobSpec::new(
            format!("std-make-clang-{}", freebsd),
            freebsd.as_str(),
            JobKind::Basic { compiler: "clang".to_string() },
        ))?;
    }

    if plan.runs_windows() {
        let windows = platform_of(platforms, OsFamily::Windows)?;
        for group in work_groups(&toolchains(plan.mode, branch.legacy_language_mode)) {
            b.add(JobSpec::new(group.name.clone(), windows.as_str(), JobKind::Windows { group }))?;
        }
    }

    let linux = || platform_of(platforms, OsFamily::LinuxContainer);
    if plan.runs_coverage() {
        b.add(JobSpec::new(COVERAGE_JOB, linux()?, JobKind::Coverage))?;
    }
    if plan.runs_interface_stability() {
        b.add(JobSpec::new(
            INTERFACE_STABILITY_JOB,
            linux()?,
            JobKind::InterfaceStability { base_ref: plan.base_ref.clone() },
        ))?;
    }
    if plan.runs_external_scan() {
        b.add(JobSpec::new(EXTERNAL_SCAN_JOB, linux()?, JobKind::ExternalScan))?;
    }

    tracing::info!(mode = %plan.mode, jobs = b.graph.len(), "built job graph");
    Ok(b.graph)
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;

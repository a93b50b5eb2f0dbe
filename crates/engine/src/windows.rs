// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Windows test matrix: toolchain selection, cross product, work-groups,
//! and serial execution of a group.

use cim_core::{Arch, BuildConfig, BuildSystem, RunMode, Toolchain, WindowsTestConfig, WorkGroup};
use std::future::Future;

/// Visual Studio versions tested on pull requests.
pub const PR_VS_VERSIONS: &[&str] = &["2013"];
/// Visual Studio versions tested on release runs.
pub const RELEASE_VS_VERSIONS: &[&str] = &["2013", "2015", "2017"];
/// Older version still supported by legacy-mode branches.
pub const LEGACY_VS_VERSION: &str = "2010";

/// Toolchains for a run, mingw last.
pub fn toolchains(mode: RunMode, legacy: bool) -> Vec<Toolchain> {
    let mut out: Vec<Toolchain> = Vec::new();
    match mode {
        RunMode::Release => {
            if legacy {
                out.push(Toolchain::vs(LEGACY_VS_VERSION));
            }
            out.extend(RELEASE_VS_VERSIONS.iter().map(|v| Toolchain::vs(*v)));
        }
        RunMode::PrHead | RunMode::PrMerge => {
            out.extend(PR_VS_VERSIONS.iter().map(|v| Toolchain::vs(*v)));
        }
    }
    out.push(Toolchain::Mingw);
    out
}

/// Every config tested for one toolchain, in generation order.
pub fn matrix(toolchain: &Toolchain) -> Vec<WindowsTestConfig> {
    if *toolchain == Toolchain::Mingw {
        return vec![WindowsTestConfig::mingw()];
    }
    let mut configs = Vec::new();
    for build_config in [BuildConfig::Release, BuildConfig::Debug] {
        for arch in [Arch::Win32, Arch::X64] {
            for build_system in [BuildSystem::Shipped, BuildSystem::Cmake] {
                for retarget in [false, true] {
                    configs.push(WindowsTestConfig {
                        toolchain: toolchain.clone(),
                        build_config,
                        arch,
                        build_system,
                        retarget,
                    });
                }
            }
        }
    }
    configs
}

/// Partition the matrices of `toolchains` into work-groups: one per
/// toolchain, with the slow debug CMake configs split into their own group.
pub fn work_groups(toolchains: &[Toolchain]) -> Vec<WorkGroup> {
    let mut groups = Vec::new();
    for toolchain in toolchains {
        let (slow, rest): (Vec<_>, Vec<_>) = matrix(toolchain).into_iter().partition(|c| c.is_slow());
        let base = format!("windows-{}", toolchain.slug());
        if !rest.is_empty() {
            groups.push(WorkGroup { name: base.clone(), configs: rest });
        }
        if !slow.is_empty() {
            groups.push(WorkGroup { name: format!("{}-debug-cmake", base), configs: slow });
        }
    }
    groups
}

/// Run every config of `group` in order, continuing past failures.
/// Returns the first failure once all configs have run.
pub async fn run_group<E, F, Fut>(group: &WorkGroup, mut run_config: F) -> Result<(), E>
where
    E: std::fmt::Display,
    F: FnMut(usize, &WindowsTestConfig) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut first_error = None;
    for (i, config) in group.configs.iter().enumerate() {
        match run_config(i, config).await {
            Ok(()) => tracing::info!(group = %group.name, %config, "windows config passed"),
            Err(e) => {
                tracing::error!(group = %group.name, %config, error = %e, "windows config failed");
                first_error.get_or_insert(e);
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}

#[cfg(test)]
#[path = "windows_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the cim binary.

use cim_core::{parse_switch, RunSwitches};
use std::path::PathBuf;

use crate::exit_error::{ExitError, CONFIG_ERROR};

fn switch(name: &str, default: bool) -> Result<bool, ExitError> {
    match std::env::var(name) {
        Ok(value) => parse_switch(&value).ok_or_else(|| {
            ExitError::new(CONFIG_ERROR, format!("{} must be a boolean, got `{}`", name, value))
        }),
        Err(_) => Ok(default),
    }
}

/// Category switches for release runs: `RUN_ALL_SH`, `RUN_FREEBSD`,
/// `RUN_WINDOWS_TEST`, `RUN_COVERAGE` and `PUSH_COVERITY`.
pub fn run_switches() -> Result<RunSwitches, ExitError> {
    let defaults = RunSwitches::default();
    Ok(RunSwitches {
        all_components: switch("RUN_ALL_SH", defaults.all_components)?,
        freebsd: switch("RUN_FREEBSD", defaults.freebsd)?,
        windows: switch("RUN_WINDOWS_TEST", defaults.windows)?,
        coverage: switch("RUN_COVERAGE", defaults.coverage)?,
        external_scan: switch("PUSH_COVERITY", defaults.external_scan)?,
    })
}

/// Token for the commit status API.
pub fn status_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Password for the image registry; login is skipped without one.
pub fn registry_password() -> Option<String> {
    std::env::var("CIM_REGISTRY_PASSWORD").ok().filter(|s| !s.is_empty())
}

/// Resolve the workspace root: CIM_WORK_DIR > <cache dir>/cim/workspaces > ./.cim/workspaces
pub fn work_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CIM_WORK_DIR") {
        return PathBuf::from(dir);
    }
    dirs::cache_dir()
        .map(|d| d.join("cim").join("workspaces"))
        .unwrap_or_else(|| PathBuf::from(".cim/workspaces"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

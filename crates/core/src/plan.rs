// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run mode and the category switches that shape the job graph.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// What triggered the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Head of a pull request: full matrix minus coverage, reduced Windows set
    PrHead,
    /// Merge of a pull request into its target: interface stability only
    PrMerge,
    /// Release or nightly: every category, each gated by its switch
    Release,
}

crate::simple_display! {
    RunMode {
        PrHead => "pr-head",
        PrMerge => "pr-merge",
        Release => "release",
    }
}

impl RunMode {
    pub fn is_pull_request(self) -> bool {
        matches!(self, RunMode::PrHead | RunMode::PrMerge)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown run mode: {0} (expected pr-head, pr-merge or release)")]
pub struct UnknownRunMode(pub String);

impl FromStr for RunMode {
    type Err = UnknownRunMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pr-head" | "pr" | "head" => Ok(RunMode::PrHead),
            "pr-merge" | "merge" => Ok(RunMode::PrMerge),
            "release" | "nightly" => Ok(RunMode::Release),
            other => Err(UnknownRunMode(other.to_string())),
        }
    }
}

/// Per-category switches honored by release runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSwitches {
    pub all_components: bool,
    pub freebsd: bool,
    pub windows: bool,
    pub coverage: bool,
    pub external_scan: bool,
}

impl Default for RunSwitches {
    fn default() -> Self {
        Self { all_components: true, freebsd: true, windows: true, coverage: true, external_scan: false }
    }
}

/// Parse a boolean switch value. Unrecognized text is `None`.
pub fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Default seed passed to the test driver.
pub const DEFAULT_SEED: u32 = 4;

/// Everything the job graph builder needs besides the branch and platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunPlan {
    pub mode: RunMode,
    pub switches: RunSwitches,
    /// Ref the interface stability check compares against
    pub base_ref: String,
    pub seed: u32,
}

impl RunPlan {
    pub fn new(mode: RunMode) -> Self {
        Self { mode, switches: RunSwitches::default(), base_ref: "origin/development".to_string(), seed: DEFAULT_SEED }
    }

    crate::setters! {
        into {
            base_ref: String,
        }
        set {
            switches: RunSwitches,
            seed: u32,
        }
    }

    pub fn runs_components(&self) -> bool {
        match self.mode {
            RunMode::PrHead => true,
            RunMode::PrMerge => false,
            RunMode::Release => self.switches.all_components,
        }
    }

    pub fn runs_freebsd(&self) -> bool {
        match self.mode {
            RunMode::PrHead => true,
            RunMode::PrMerge => false,
            RunMode::Release => self.switches.freebsd,
        }
    }

    pub fn runs_windows(&self) -> bool {
        match self.mode {
            RunMode::PrHead => true,
            RunMode::PrMerge => false,
            RunMode::Release => self.switches.windows,
        }
    }

    pub fn runs_coverage(&self) -> bool {
        self.mode == RunMode::Release && self.switches.coverage
    }

    pub fn runs_external_scan(&self) -> bool {
        self.mode == RunMode::Release && self.switches.external_scan
    }

    pub fn runs_interface_stability(&self) -> bool {
        self.mode == RunMode::PrMerge
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conventions of the branch under test: where its tools live and how
//! they are invoked.

use cim_core::RequirementsOverride;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Paths are relative to the source checkout unless noted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Test driver that lists and runs components
    pub driver: String,
    /// Text in the driver's `--help` output proving it supports listing
    pub help_marker: String,
    /// Dependency pinning tool; its presence enables pinned installs
    pub pinning_tool: String,
    /// Build file inspected for the legacy language flag
    pub legacy_build_file: String,
    pub legacy_marker: String,
    /// Environment variable naming the outcome file for the driver
    pub outcome_env_var: String,
    /// Component -> platform assignments applied after discovery
    pub static_overrides: IndexMap<String, String>,
    pub requirements_override: Option<RequirementsOverride>,
    pub coverage_command: Vec<String>,
    pub interface_command: Vec<String>,
    pub analysis_command: Vec<String>,
    /// Windows worker script, run from the workspace root with
    /// `<source dir> <log dir> <config json>` appended
    pub windows_command: Vec<String>,
    /// Static-analysis build wrapper, given a scratch dir and `make`
    pub scan_command: Vec<String>,
    /// Upload of the packed scan results (`cov-int.tgz`), if configured
    pub scan_upload: Option<Vec<String>>,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            driver: "tests/scripts/all.sh".to_string(),
            help_marker: "list-components".to_string(),
            pinning_tool: "scripts/min_requirements.py".to_string(),
            legacy_build_file: "CMakeLists.txt".to_string(),
            legacy_marker: "-std=c89".to_string(),
            outcome_env_var: "MBEDTLS_TEST_OUTCOME_FILE".to_string(),
            static_overrides: IndexMap::from([("build_armcc".to_string(), "arm-compilers".to_string())]),
            requirements_override: None,
            coverage_command: strings(&["tests/scripts/basic-build-test.sh"]),
            interface_command: strings(&["scripts/abi_check.py", "-s", "identifiers", "--brief"]),
            analysis_command: strings(&["tests/scripts/analyze_outcomes.py"]),
            windows_command: strings(&["python", "windows/test_windows.py"]),
            scan_command: strings(&["cov-build", "--dir", "cov-int"]),
            scan_upload: None,
        }
    }
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

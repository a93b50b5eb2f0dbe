// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

const ASSIGNMENTS: &str = r#"{"test_gcc_opt": "ubuntu-16.04"}"#;

#[test]
fn invalid_switch_value_is_a_config_error() {
    cli()
        .args(&["plan", "--assignments", ASSIGNMENTS])
        .env("RUN_WINDOWS_TEST", "sometimes")
        .exits_with(3)
        .stderr_has("RUN_WINDOWS_TEST must be a boolean, got `sometimes`");
}

#[test]
fn unknown_platform_assignment_is_a_config_error() {
    cli()
        .args(&["plan", "--assignments", r#"{"test_x": "solaris"}"#])
        .exits_with(3)
        .stderr_has("unknown platform solaris");
}

#[test]
fn malformed_assignments_are_a_config_error() {
    cli().args(&["plan", "--assignments", "[1, 2"]).exits_with(3).stderr_has("invalid --assignments");
}

#[test]
fn unknown_mode_is_a_usage_error() {
    cli().args(&["plan", "--assignments", ASSIGNMENTS, "--mode", "nightly"]).exits_with(3);
}

#[test]
fn change_without_status_repo_is_rejected_before_running() {
    cli()
        .args(&["run", "--repo", "https://example.invalid/lib.git", "--revision", "abc"])
        .args(&["--change", "abc"])
        .exits_with(3)
        .stderr_has("--change requires --status-repo");
}

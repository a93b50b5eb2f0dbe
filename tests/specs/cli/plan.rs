// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

const ASSIGNMENTS: &str = r#"{"test_gcc_opt": "ubuntu-16.04", "build_armcc": "arm-compilers"}"#;

#[test]
fn merge_runs_plan_only_the_interface_check() {
    cli()
        .args(&["plan", "--assignments", ASSIGNMENTS, "--mode", "pr-merge"])
        .passes()
        .stdout_eq("interface-stability  ubuntu-16.04  interface-stability\n1 jobs\n");
}

#[test]
fn head_runs_plan_components_basics_and_windows() {
    cli()
        .args(&["plan", "--assignments", ASSIGNMENTS])
        .passes()
        .stdout_has("all_sh-ubuntu-16.04-test_gcc_opt")
        .stdout_has("all_sh-arm-compilers-build_armcc")
        .stdout_has("std-make-clang-freebsd")
        .stdout_has("windows-mingw")
        .stdout_lacks("code-coverage");
}

#[test]
fn release_switches_come_from_the_environment() {
    cli()
        .args(&["plan", "--assignments", ASSIGNMENTS, "--mode", "release"])
        .env("RUN_WINDOWS_TEST", "false")
        .env("RUN_FREEBSD", "0")
        .passes()
        .stdout_has("code-coverage")
        .stdout_lacks("windows-")
        .stdout_lacks("freebsd");
}

#[test]
fn json_lists_every_job() {
    let out = cli().args(&["plan", "--assignments", ASSIGNMENTS, "--mode", "pr-merge", "--json"]).passes();
    let jobs = out.json();
    let jobs = jobs.as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["name"], "interface-stability");
    assert_eq!(jobs[0]["platform"], "ubuntu-16.04");
}

#[test]
fn platforms_file_replaces_the_builtin_table() {
    let dir = scratch(&[(
        "platforms.toml",
        r#"
[[platform]]
name = "box"
family = "linux-container"
label = "docker"
container = true
"#,
    )]);
    let path = dir.path().join("platforms.toml");
    cli()
        .args(&["plan", "--assignments", r#"{"test_x": "box"}"#, "--mode", "pr-merge"])
        .args(&["--platforms", path.to_str().unwrap()])
        .passes()
        .stdout_eq("interface-stability  box  interface-stability\n1 jobs\n");
}

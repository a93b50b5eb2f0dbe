// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn pull_requests_test_one_visual_studio_and_mingw() {
    cli()
        .args(&["windows-groups"])
        .passes()
        .stdout_has("windows-vs2013 (")
        .stdout_has("windows-vs2013-debug-cmake (")
        .stdout_has("windows-mingw (1 configs)\n  mingw Release Win32 shipped\n")
        .stdout_lacks("vs2015");
}

#[test]
fn legacy_release_adds_the_oldest_visual_studio_first() {
    let out = cli().args(&["windows-groups", "--mode", "release", "--legacy"]).passes();
    let first = out.stdout.lines().next().unwrap();
    assert!(first.starts_with("windows-vs2010 ("), "{}", first);
    let out = out.stdout_has("windows-vs2017-debug-cmake (");
    assert!(out.stdout.trim_end().ends_with("mingw Release Win32 shipped"));
}

#[test]
fn json_groups_carry_their_configs() {
    let out = cli().args(&["windows-groups", "--json"]).passes();
    let groups = out.json();
    let groups = groups.as_array().unwrap();
    assert_eq!(groups.len(), 3);
    let mingw = &groups[2];
    assert_eq!(mingw["name"], "windows-mingw");
    assert_eq!(mingw["configs"][0]["toolchain"], "mingw");
    assert_eq!(mingw["configs"][0]["arch"], "Win32");
}

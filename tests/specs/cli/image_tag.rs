// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn tag_is_platform_and_git_blob_hash() {
    let dir = scratch(&[("ubuntu-16.04/Dockerfile", "FROM ubuntu:16.04\n")]);
    let path = dir.path().join("ubuntu-16.04/Dockerfile");
    cli()
        .args(&["image-tag", "ubuntu-16.04", path.to_str().unwrap()])
        .passes()
        .stdout_eq("ubuntu-16.04-53433af3baf6052cb95cd626eb1bd32ba378461e\n");
}

#[test]
fn missing_definition_is_a_config_error() {
    cli()
        .args(&["image-tag", "ubuntu-16.04", "/nonexistent/Dockerfile"])
        .exits_with(3)
        .stderr_has("cannot read /nonexistent/Dockerfile");
}

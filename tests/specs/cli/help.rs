// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("run")
        .stdout_has("plan")
        .stdout_has("image-tag")
        .stdout_has("windows-groups");
}

#[test]
fn run_help_names_status_options() {
    cli().args(&["run", "--help"]).passes().stdout_has("--change").stdout_has("--status-repo");
}

#[test]
fn version_is_printed() {
    cli().args(&["--version"]).passes().stdout_has("cim 0.2");
}

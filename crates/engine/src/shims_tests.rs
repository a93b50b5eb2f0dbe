// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cim_core::{PlatformRegistry, RequirementsOverride};

const TOOL: &str = "scripts/min_requirements.py";

fn platform(name: &str) -> Platform {
    PlatformRegistry::builtin().get(name).cloned().unwrap()
}

#[test]
fn plain_linux_needs_nothing() {
    let shims = plan_shims(&platform("ubuntu-22.04"), &BranchInfo::new(), TOOL, "/w");
    assert!(shims.is_empty());
}

#[test]
fn tls_tools_are_stubbed_where_missing() {
    let shims = plan_shims(&platform("arm-compilers"), &BranchInfo::new(), TOOL, "/w");
    let env: Vec<(&str, &str)> = shims.env.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(env, vec![("OPENSSL", "false"), ("GNUTLS_CLI", "false"), ("GNUTLS_SERV", "false")]);
    assert!(shims.commands.is_empty());
}

#[test]
fn freebsd_gets_gnu_make_and_compiler_wrapper() {
    let shims = plan_shims(&platform("freebsd"), &BranchInfo::new(), TOOL, "/home/ci/ws-1/");
    assert_eq!(shims.env.get("CC").map(String::as_str), Some("/home/ci/ws-1/bin/cc"));
    assert_eq!(shims.env["PATH"], "/home/ci/ws-1/bin:$PATH");
    assert_eq!(shims.env.get("OPENSSL").map(String::as_str), Some("false"));

    let commands: Vec<String> = shims.commands.iter().map(|c| c.to_string()).collect();
    assert_eq!(commands, vec!["mkdir -p bin", "ln -sf /usr/local/bin/gmake bin/make", "chmod +x bin/cc"]);

    assert_eq!(shims.files.len(), 1);
    let wrapper = String::from_utf8(shims.files[0].content.clone()).unwrap();
    assert_eq!(shims.files[0].path, "bin/cc");
    assert!(wrapper.contains("exec clang -Wno-error=unused-command-line-argument \"$@\""));
}

#[test]
fn pinned_requirements_install_with_override() {
    let mut branch = BranchInfo::new();
    branch.supports_pinned_requirements = true;
    let plain = plan_shims(&platform("ubuntu-22.04"), &branch, TOOL, "/w");
    assert_eq!(plain.commands.len(), 1);
    assert_eq!(plain.commands[0].to_string(), "python3 scripts/min_requirements.py --user");
    assert_eq!(plain.commands[0].cwd.as_deref(), Some("src"));
    assert!(plain.files.is_empty());

    branch.requirements_override = Some(RequirementsOverride {
        filename: "ci.requirements.txt".to_string(),
        content: "pylint==2.4\n".to_string(),
    });
    let with_override = plan_shims(&platform("ubuntu-22.04"), &branch, TOOL, "/w");
    assert_eq!(
        with_override.commands[0].to_string(),
        "python3 scripts/min_requirements.py --user ci.requirements.txt"
    );
    assert_eq!(
        with_override.files,
        vec![ShimFile { path: "src/ci.requirements.txt".to_string(), content: b"pylint==2.4\n".to_vec() }]
    );
}

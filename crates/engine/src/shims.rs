// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Platform environment fixes applied before a job's test commands.

use crate::source::{in_source, SOURCE_DIR};
use cim_core::{BranchInfo, CommandSpec, OsFamily, Platform, INHERITED_PATH};
use indexmap::IndexMap;

/// TLS interop tools stubbed out on platforms that lack them.
pub const TLS_TOOL_VARS: &[&str] = &["OPENSSL", "GNUTLS_CLI", "GNUTLS_SERV"];

/// GNU make as installed from FreeBSD ports.
pub const GNU_MAKE: &str = "/usr/local/bin/gmake";

/// Warning clang raises for flags the library's feature detection probes.
pub const SPURIOUS_WARNING_FLAG: &str = "-Wno-error=unused-command-line-argument";

/// A file created in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShimFile {
    /// Relative to the workspace root
    pub path: String,
    pub content: Vec<u8>,
}

/// Everything a platform and branch need before the real test command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shims {
    /// Environment for every later command of the job
    pub env: IndexMap<String, String>,
    pub files: Vec<ShimFile>,
    /// Setup commands, run in order after the files are written
    pub commands: Vec<CommandSpec>,
}

impl Shims {
    pub fn is_empty(&self) -> bool {
        self.env.is_empty() && self.files.is_empty() && self.commands.is_empty()
    }
}

/// Shims for running in `workspace_root` (as seen by the commands).
pub fn plan_shims(
    platform: &Platform,
    branch: &BranchInfo,
    pinning_tool: &str,
    workspace_root: &str,
) -> Shims {
    let mut shims = Shims::default();

    if platform.lacks_reference_tls_tools {
        for var in TLS_TOOL_VARS {
            shims.env.insert(var.to_string(), "false".to_string());
        }
    }

    if !platform.family.has_gnu_make() {
        let bin = format!("{}/bin", workspace_root.trim_end_matches('/'));
        shims.commands.push(CommandSpec::new("mkdir").args(["-p", "bin"]));
        shims.commands.push(CommandSpec::new("ln").args(["-sf", GNU_MAKE, "bin/make"]));
        if platform.family == OsFamily::FreeBsd {
            shims.files.push(ShimFile {
                path: "bin/cc".to_string(),
                content: format!("#!/bin/sh\nexec clang {} \"$@\"\n", SPURIOUS_WARNING_FLAG).into_bytes(),
            });
            shims.commands.push(CommandSpec::new("chmod").args(["+x", "bin/cc"]));
            shims.env.insert("CC".to_string(), format!("{}/cc", bin));
        }
        shims.env.insert("PATH".to_string(), format!("{}:{}", bin, INHERITED_PATH));
    }

    if branch.supports_pinned_requirements {
        let mut install = CommandSpec::new("python3").args([pinning_tool, "--user"]).cwd(SOURCE_DIR);
        if let Some(over) = &branch.requirements_override {
            shims.files.push(ShimFile {
                path: in_source(&over.filename),
                content: over.content.clone().into_bytes(),
            });
            install = install.arg(over.filename.as_str());
        }
        shims.commands.push(install);
    }

    shims
}

#[cfg(test)]
#[path = "shims_tests.rs"]
mod tests;

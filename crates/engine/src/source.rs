// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The revision under test and how a workspace obtains it.

use cim_core::CommandSpec;
use serde::{Deserialize, Serialize};

/// Checkout directory, relative to the workspace root.
pub const SOURCE_DIR: &str = "src";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Anything `git clone` accepts
    pub url: String,
    /// Commit, tag or branch to test
    pub revision: String,
}

impl SourceSpec {
    pub fn new(url: impl Into<String>, revision: impl Into<String>) -> Self {
        Self { url: url.into(), revision: revision.into() }
    }

    /// Commands that leave the revision checked out in [`SOURCE_DIR`].
    pub fn checkout_commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec::new("git").args(["clone", "--quiet", "--no-checkout", self.url.as_str(), SOURCE_DIR]),
            CommandSpec::new("git")
                .args(["checkout", "--quiet", "--force", self.revision.as_str()])
                .cwd(SOURCE_DIR),
            CommandSpec::new("git")
                .args(["submodule", "update", "--quiet", "--init", "--recursive"])
                .cwd(SOURCE_DIR),
        ]
    }
}

/// `path` inside the checkout, relative to the workspace root.
pub fn in_source(path: &str) -> String {
    format!("{}/{}", SOURCE_DIR, path)
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;

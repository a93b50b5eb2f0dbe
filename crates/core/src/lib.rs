// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cim-core: data model for the cim test-matrix orchestrator

pub mod macros;

pub mod branch;
pub mod command;
pub mod hash;
pub mod job;
pub mod outcome;
pub mod plan;
pub mod platform;
pub mod status;
pub mod windows;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use branch::{BranchInfo, RequirementsOverride};
pub use command::{CommandSpec, INHERITED_PATH};
pub use hash::git_blob_sha1;
pub use job::{JobClass, JobKind, JobSpec};
pub use outcome::{OutcomeCounts, OutcomeRow};
pub use plan::{parse_switch, RunMode, RunPlan, RunSwitches, UnknownRunMode, DEFAULT_SEED};
pub use platform::{OsFamily, Platform, PlatformError, PlatformRegistry};
pub use status::{truncate_description, CommitState, MAX_DESCRIPTION_CHARS};
pub use windows::{Arch, BuildConfig, BuildSystem, Toolchain, WindowsTestConfig, WorkGroup};

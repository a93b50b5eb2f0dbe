// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioral specs for the `cim` binary.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/cli/exit_codes.rs"]
mod cli_exit_codes;
#[path = "specs/cli/help.rs"]
mod cli_help;
#[path = "specs/cli/image_tag.rs"]
mod cli_image_tag;
#[path = "specs/cli/plan.rs"]
mod cli_plan;
#[path = "specs/cli/windows_groups.rs"]
mod cli_windows_groups;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::output::{print_json, render_groups};
use cim_core::RunMode;
use cim_engine::{toolchains, work_groups};
use clap::Args;

#[derive(Args, Debug)]
pub struct WindowsGroupsArgs {
    #[arg(long, default_value = "pr-head")]
    pub mode: RunMode,
    /// Include the toolchains only C89 branches support
    #[arg(long)]
    pub legacy: bool,
    #[arg(long)]
    pub json: bool,
}

pub fn handle(args: WindowsGroupsArgs) -> anyhow::Result<()> {
    let groups = work_groups(&toolchains(args.mode, args.legacy));
    if args.json {
        print_json(&groups)
    } else {
        print!("{}", render_groups(&groups));
        Ok(())
    }
}

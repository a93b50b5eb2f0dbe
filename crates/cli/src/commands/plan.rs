// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cim plan`: print the job graph for a given set of assignments without
//! touching any worker.

use crate::env;
use crate::exit_error::ExitError;
use crate::output::{print_json, render_jobs};
use cim_core::{BranchInfo, RunMode, RunPlan, DEFAULT_SEED};
use cim_engine::build_jobs;
use clap::Args;
use indexmap::IndexMap;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Component to platform assignments, as a JSON object
    #[arg(long)]
    pub assignments: String,
    #[arg(long, default_value = "pr-head")]
    pub mode: RunMode,
    /// Branch still builds in C89 mode
    #[arg(long)]
    pub legacy: bool,
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u32,
    #[arg(long, default_value = "origin/development")]
    pub base_ref: String,
    /// Platform registry (TOML); the built-in table when omitted
    #[arg(long, env = "CIM_PLATFORMS")]
    pub platforms: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

pub fn handle(args: PlanArgs) -> anyhow::Result<()> {
    let assignments: IndexMap<String, String> = serde_json::from_str(&args.assignments)
        .map_err(|e| ExitError::config(format!("invalid --assignments: {}", e)))?;
    let mut branch = BranchInfo::from_assignments(assignments);
    branch.legacy_language_mode = args.legacy;

    let plan = RunPlan::new(args.mode).switches(env::run_switches()?).seed(args.seed).base_ref(args.base_ref);
    let platforms = super::load_platforms(args.platforms.as_deref())?;
    let graph = build_jobs(&branch, &plan, &platforms).map_err(|e| ExitError::config(e.to_string()))?;

    if args.json {
        print_json(&graph.values().collect::<Vec<_>>())
    } else {
        print!("{}", render_jobs(&graph));
        Ok(())
    }
}

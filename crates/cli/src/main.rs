// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cim: runs the CI test matrix of a branch and reports the result.

mod color;
mod commands;
mod env;
mod exit_error;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use commands::{image_tag, plan, run, windows_groups};
use exit_error::{ExitError, CONFIG_ERROR};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cim", version, about = "CI test-matrix orchestrator", styles = color::styles())]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true, env = "CIM_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover, build and run every job, then report
    Run(run::RunArgs),
    /// Print the job graph for known component assignments
    Plan(plan::PlanArgs),
    /// Print the content-addressed image tag of a build definition
    ImageTag(image_tag::ImageTagArgs),
    /// Print the Windows work groups of a run mode
    WindowsGroups(windows_groups::WindowsGroupsArgs),
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { CONFIG_ERROR } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let guard = match logging::init(cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: cannot set up logging: {}", e);
            std::process::exit(CONFIG_ERROR);
        }
    };

    if let Err(e) = dispatch(cli.command).await {
        let code = e.downcast_ref::<ExitError>().map_or(1, |exit| exit.code);
        eprintln!("error: {:#}", e);
        drop(guard);
        std::process::exit(code);
    }
}

async fn dispatch(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Run(args) => run::handle(args).await,
        Command::Plan(args) => plan::handle(args),
        Command::ImageTag(args) => image_tag::handle(args),
        Command::WindowsGroups(args) => windows_groups::handle(args),
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::exit_error::ExitError;
use cim_engine::image_tag;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ImageTagArgs {
    pub platform: String,
    /// Build definition the tag is derived from
    pub dockerfile: PathBuf,
}

pub fn handle(args: ImageTagArgs) -> anyhow::Result<()> {
    let definition = std::fs::read(&args.dockerfile)
        .map_err(|e| ExitError::config(format!("cannot read {}: {}", args.dockerfile.display(), e)))?;
    println!("{}", image_tag(&args.platform, &definition));
    Ok(())
}

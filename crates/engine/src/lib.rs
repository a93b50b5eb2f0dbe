// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cim-engine: introspection, job planning, parallel execution and reporting

pub mod analysis;
pub mod assign;
pub mod config;
pub mod context;
pub mod execute;
pub mod graph;
pub mod image;
pub mod introspect;
pub mod pipeline;
pub mod report;
pub mod retry;
pub mod runner;
pub mod shims;
pub mod source;
pub mod windows;

pub use analysis::{AnalysisError, AnalysisVerdict, FinalReport, MERGED_OUTCOMES};
pub use assign::verify_full_coverage;
pub use config::Conventions;
pub use context::RunContext;
pub use execute::{Engine, ExecuteError, RunSummary};
pub use graph::{build_jobs, GraphError, JobGraph};
pub use image::{image_tag, BuildDefinitions, ImageCache, ImageError, ImageRef};
pub use introspect::{Introspector, PreflightError};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, REPORT_FILE};
pub use report::{CiInstance, ReportConfig, Reporter};
pub use runner::{JobError, JobRunner, StandardRunner};
pub use source::SourceSpec;
pub use windows::{toolchains, work_groups};

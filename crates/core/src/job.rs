// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job definitions: named, platform-bound units of deferred work.

use crate::windows::WorkGroup;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deadline applied to every job.
pub const BASE_JOB_TIMEOUT: Duration = Duration::from_secs(120 * 60);
/// Extra time for jobs that first queue for dedicated hardware.
pub const HARDWARE_QUEUE_OFFSET: Duration = Duration::from_secs(30 * 60);
/// Extra time for jobs with an additional testing phase.
pub const EXTRA_PHASE_OFFSET: Duration = Duration::from_secs(20 * 60);

/// Job class, which determines the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobClass {
    Component,
    Basic,
    Windows,
    Coverage,
    InterfaceStability,
    ExternalScan,
}

crate::simple_display! {
    JobClass {
        Component => "component",
        Basic => "basic",
        Windows => "windows",
        Coverage => "coverage",
        InterfaceStability => "interface-stability",
        ExternalScan => "external-scan",
    }
}

impl JobClass {
    pub fn deadline(self) -> Duration {
        match self {
            JobClass::Windows => BASE_JOB_TIMEOUT + HARDWARE_QUEUE_OFFSET,
            JobClass::Coverage => BASE_JOB_TIMEOUT + EXTRA_PHASE_OFFSET,
            _ => BASE_JOB_TIMEOUT,
        }
    }
}

/// What a job does once it has a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobKind {
    /// Run one test-driver component
    Component { component: String, seed: u32 },
    /// Plain make build and self-test with one compiler
    Basic { compiler: String },
    /// Serially run a group of Windows configs
    Windows { group: WorkGroup },
    Coverage,
    /// Compare the public interface against `base_ref`
    InterfaceStability { base_ref: String },
    /// Build under the external static-analysis scanner and upload
    ExternalScan,
}

impl JobKind {
    pub fn class(&self) -> JobClass {
        match self {
            JobKind::Component { .. } => JobClass::Component,
            JobKind::Basic { .. } => JobClass::Basic,
            JobKind::Windows { .. } => JobClass::Windows,
            JobKind::Coverage => JobClass::Coverage,
            JobKind::InterfaceStability { .. } => JobClass::InterfaceStability,
            JobKind::ExternalScan => JobClass::ExternalScan,
        }
    }
}

/// A named unit of work bound to a platform.
///
/// The name is unique within a run; it keys failure records, artifacts and
/// status reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub name: String,
    pub platform: String,
    pub kind: JobKind,
}

impl JobSpec {
    pub fn new(name: impl Into<String>, platform: impl Into<String>, kind: JobKind) -> Self {
        Self { name: name.into(), platform: platform.into(), kind }
    }

    pub fn class(&self) -> JobClass {
        self.kind.class()
    }

    pub fn deadline(&self) -> Duration {
        self.class().deadline()
    }

    /// Whether the job persists a test outcome record.
    pub fn produces_outcomes(&self) -> bool {
        matches!(self.kind, JobKind::Component { .. })
    }

    /// File name of the outcome record inside the workspace and artifacts.
    pub fn outcome_file_name(&self) -> String {
        format!("{}-outcome.csv", self.name)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;

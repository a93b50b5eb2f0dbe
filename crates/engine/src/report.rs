// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External reporting: commit statuses and the summary email.

use crate::analysis::FinalReport;
use cim_adapters::{EmailMessage, MailAdapter, StatusAdapter, StatusUpdate};
use cim_core::{truncate_description, CommitState};
use std::str::FromStr;
use thiserror::Error;

/// Which CI deployment is reporting; prefixes the status context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CiInstance {
    #[default]
    OpenCi,
    Internal,
}

cim_core::simple_display! {
    CiInstance {
        OpenCi => "OpenCI",
        Internal => "Internal",
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown CI instance: {0} (expected open-ci or internal)")]
pub struct UnknownCiInstance(pub String);

impl FromStr for CiInstance {
    type Err = UnknownCiInstance;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open-ci" | "openci" | "open" => Ok(CiInstance::OpenCi),
            "internal" => Ok(CiInstance::Internal),
            other => Err(UnknownCiInstance(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportConfig {
    /// Commit of the change request under test; statuses are only sent with one
    pub change: Option<String>,
    pub ci: CiInstance,
    /// Merge-commit run (interface stability) rather than head run
    pub merge: bool,
    pub target_url: Option<String>,
    pub branch: String,
    pub recipients: Vec<String>,
    pub from: Option<String>,
}

impl ReportConfig {
    pub fn new(branch: impl Into<String>) -> Self {
        Self { branch: branch.into(), ..Self::default() }
    }

    cim_core::setters! {
        set {
            ci: CiInstance,
            merge: bool,
            recipients: Vec<String>,
        }
        option {
            change: String,
            target_url: String,
            from: String,
        }
    }
}

pub struct Reporter<S: StatusAdapter, M: MailAdapter> {
    status: S,
    mail: M,
    config: ReportConfig,
}

impl<S: StatusAdapter, M: MailAdapter> Reporter<S, M> {
    pub fn new(status: S, mail: M, config: ReportConfig) -> Self {
        Self { status, mail, config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn default_context(&self) -> String {
        let suite = if self.config.merge { "Interface stability tests" } else { "PR tests" };
        format!("{}: {}", self.config.ci, suite)
    }

    /// Publish a commit status. Without a change request this does nothing;
    /// transport errors are logged, never returned.
    pub async fn notify(&self, state: CommitState, description: &str, context: Option<&str>) {
        let Some(sha) = &self.config.change else {
            tracing::debug!(%state, "no change request, skipping status");
            return;
        };
        let update = StatusUpdate {
            sha: sha.clone(),
            state,
            description: truncate_description(description),
            context: context.map_or_else(|| self.default_context(), String::from),
            target_url: self.config.target_url.clone(),
        };
        match self.status.set_status(&update).await {
            Ok(()) => tracing::info!(%state, context = %update.context, "published status"),
            Err(e) => tracing::warn!(%state, error = %e, "failed to publish status"),
        }
    }

    pub fn summary_email(&self, report: &FinalReport) -> EmailMessage {
        let subject = if report.passed() {
            format!("{}: all tests PASSED", self.config.branch)
        } else {
            format!("{}: FAILED ({} jobs)", self.config.branch, report.failed_jobs.len())
        };

        let mut body = format!("Branch: {}\nJobs run: {}\n", self.config.branch, report.jobs);
        if !report.failed_jobs.is_empty() {
            body.push_str("\nFailed jobs:\n");
            for job in &report.failed_jobs {
                body.push_str(&format!("  - {}\n", job));
            }
        }
        let o = &report.outcomes;
        body.push_str(&format!(
            "\nTest outcomes: {} passed, {} failed, {} skipped, {} other\n",
            o.pass, o.fail, o.skip, o.other
        ));
        body.push_str(&format!("Outcome analysis: {}\n", report.analysis));
        if let Some(coverage) = &report.coverage_summary {
            body.push_str(&format!("\nCoverage:\n{}\n", coverage));
        }

        EmailMessage {
            from: self.config.from.clone(),
            to: self.config.recipients.clone(),
            subject,
            body,
        }
    }

    /// Send the summary email when recipients are configured.
    pub async fn send_summary(&self, report: &FinalReport) {
        if self.config.recipients.is_empty() {
            tracing::debug!("no recipients, skipping summary email");
            return;
        }
        let message = self.summary_email(report);
        match self.mail.send(&message).await {
            Ok(()) => tracing::info!(subject = %message.subject, "sent summary email"),
            Err(e) => tracing::warn!(error = %e, "failed to send summary email"),
        }
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

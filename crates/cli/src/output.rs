// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::color::Tone;
use cim_core::WorkGroup;
use cim_engine::{FinalReport, JobGraph};

/// One line per job: name, platform and class in aligned columns.
pub fn render_jobs(graph: &JobGraph) -> String {
    let name_w = graph.keys().map(String::len).max().unwrap_or(0);
    let platform_w = graph.values().map(|j| j.platform.len()).max().unwrap_or(0);
    let mut out = String::new();
    for job in graph.values() {
        let line = format!("{:<name_w$}  {:<platform_w$}  {}", job.name, job.platform, job.class());
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str(&format!("{} jobs\n", graph.len()));
    out
}

/// Each work-group heading followed by its configs, indented.
pub fn render_groups(groups: &[WorkGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("{} ({} configs)\n", Tone::Header.paint(&group.name), group.configs.len()));
        for config in &group.configs {
            out.push_str(&format!("  {}\n", config));
        }
    }
    out
}

pub fn render_report(report: &FinalReport) -> String {
    let mut out = format!("{}\n", report.description());
    for job in &report.failed_jobs {
        out.push_str(&format!("  failed: {}\n", job));
    }
    let o = &report.outcomes;
    out.push_str(&format!("outcomes: {} pass, {} fail, {} skip\n", o.pass, o.fail, o.skip));
    out.push_str(&format!("analysis: {}\n", report.analysis));
    out
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

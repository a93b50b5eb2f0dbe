// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cim_core::test_support::{basic_job, component_job};
use cim_core::{Toolchain, WindowsTestConfig};
use cim_engine::AnalysisVerdict;
use serial_test::serial;

#[test]
fn jobs_are_aligned_in_columns() {
    let mut graph = JobGraph::new();
    graph.insert("all_sh-P1-test_x".to_string(), component_job("all_sh-P1-test_x", "P1", "test_x"));
    graph.insert("std-make-gcc-ubuntu".to_string(), basic_job("std-make-gcc-ubuntu", "ubuntu"));
    assert_eq!(
        render_jobs(&graph),
        "all_sh-P1-test_x     P1      component\n\
         std-make-gcc-ubuntu  ubuntu  basic\n\
         2 jobs\n"
    );
}

#[test]
#[serial]
fn groups_list_their_configs() {
    std::env::set_var("NO_COLOR", "1");
    let groups = vec![WorkGroup { name: "windows-mingw".to_string(), configs: vec![WindowsTestConfig::mingw()] }];
    let expected = format!("windows-mingw (1 configs)\n  {}\n", WindowsTestConfig::mingw());
    assert_eq!(render_groups(&groups), expected);
    assert!(expected.contains(&Toolchain::Mingw.slug()));
    std::env::remove_var("NO_COLOR");
}

#[test]
fn report_lists_failures() {
    let report = FinalReport {
        jobs: 2,
        failed_jobs: vec!["b".to_string()],
        outcomes: Default::default(),
        coverage_summary: None,
        analysis: AnalysisVerdict::Skipped,
    };
    assert_eq!(
        render_report(&report),
        "Failures: b\n  failed: b\noutcomes: 0 pass, 0 fail, 0 skip\nanalysis: skipped\n"
    );
}

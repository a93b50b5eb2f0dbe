// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::Conventions;
use crate::context::RunContext;
use crate::image::{BuildDefinitions, ImageCache};
use crate::source::SourceSpec;
use cim_adapters::{CommandOutput, FakeRegistryAdapter, FakeWorkerAdapter};
use cim_core::test_support::two_platform_registry;
use cim_core::{BranchInfo, PlatformRegistry};
use std::sync::Arc;

fn analysis_command() -> Vec<String> {
    Conventions::default().analysis_command
}

struct Harness {
    worker: FakeWorkerAdapter,
    runner: StandardRunner<FakeWorkerAdapter, FakeRegistryAdapter>,
    platforms: PlatformRegistry,
    _dirs: (tempfile::TempDir, tempfile::TempDir),
}

fn harness() -> Harness {
    let defs = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(defs.path().join("P1")).unwrap();
    std::fs::write(defs.path().join("P1/Dockerfile"), "FROM debian").unwrap();
    let artifacts = tempfile::tempdir().unwrap();
    let worker = FakeWorkerAdapter::new();
    let platforms = two_platform_registry();
    let runner = StandardRunner::new(
        worker.clone(),
        Arc::new(ImageCache::new(FakeRegistryAdapter::new(), "repo", BuildDefinitions::new(defs.path()))),
        Arc::new(platforms.clone()),
        Arc::new(BranchInfo::new()),
        SourceSpec::new("https://example.org/lib.git", "abc123"),
        Arc::new(Conventions::default()),
        artifacts.path(),
        Arc::new(RunContext::new()),
    );
    Harness { worker, runner, platforms, _dirs: (defs, artifacts) }
}

fn report(failed: &[&str], analysis: AnalysisVerdict) -> FinalReport {
    FinalReport {
        jobs: 5,
        failed_jobs: failed.iter().map(|s| s.to_string()).collect(),
        outcomes: OutcomeCounts::default(),
        coverage_summary: None,
        analysis,
    }
}

#[tokio::test]
async fn merge_concatenates_and_terminates_lines() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a-outcome.csv");
    let b = dir.path().join("b-outcome.csv");
    std::fs::write(&a, "P1;c;s;t1;PASS;").unwrap();
    std::fs::write(&b, "P2;c;s;t2;FAIL;boom\nP2;c;s;t3;SKIP;\n").unwrap();
    let dest = dir.path().join("out").join(MERGED_OUTCOMES);

    let merged = merge_outcomes(&[a, b], &dest).await.unwrap();
    let text = String::from_utf8(merged).unwrap();
    assert_eq!(text, "P1;c;s;t1;PASS;\nP2;c;s;t2;FAIL;boom\nP2;c;s;t3;SKIP;\n");
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), text);
    let counts = OutcomeCounts::tally(&text);
    assert_eq!((counts.pass, counts.fail, counts.skip), (1, 1, 1));
}

#[tokio::test]
async fn merge_of_nothing_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let merged = merge_outcomes(&[], &dir.path().join(MERGED_OUTCOMES)).await.unwrap();
    assert!(merged.is_empty());
}

#[tokio::test]
async fn merge_reports_unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = merge_outcomes(&[dir.path().join("missing.csv")], &dir.path().join(MERGED_OUTCOMES))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Read { .. }));
}

#[tokio::test]
async fn analysis_runs_on_merged_file_in_checkout() {
    let h = harness();
    let p1 = h.platforms.get("P1").unwrap();
    let verdict = run_analysis(&h.runner, p1, b"P1;c;s;t;PASS;\n", &analysis_command()).await;
    assert_eq!(verdict, AnalysisVerdict::Passed);

    let commands = h.worker.commands_for(ANALYSIS_JOB);
    assert_eq!(commands.last().map(String::as_str), Some("tests/scripts/analyze_outcomes.py outcomes.csv"));
    assert_eq!(h.worker.discarded().len(), 1);
}

#[tokio::test]
async fn failing_analysis_is_a_failed_verdict() {
    let h = harness();
    h.worker.on(&["tests/scripts/analyze_outcomes.py"], CommandOutput::failed(1, "2 unexpected failures"));
    let p1 = h.platforms.get("P1").unwrap();
    let verdict = run_analysis(&h.runner, p1, b"x\n", &analysis_command()).await;
    assert!(matches!(&verdict, AnalysisVerdict::Failed(msg) if msg.contains("2 unexpected failures")));
    assert_eq!(h.worker.discarded().len(), 1);
}

#[tokio::test]
async fn analysis_is_skipped_without_outcomes_or_command() {
    let h = harness();
    let p1 = h.platforms.get("P1").unwrap();
    assert_eq!(run_analysis(&h.runner, p1, b"", &analysis_command()).await, AnalysisVerdict::Skipped);
    assert_eq!(run_analysis(&h.runner, p1, b"x\n", &[]).await, AnalysisVerdict::Skipped);
    assert!(h.worker.opened().is_empty());
}

#[yare::parameterized(
    clean          = { &[],           AnalysisVerdict::Passed, true,  "All 5 jobs passed" },
    skipped        = { &[],           AnalysisVerdict::Skipped, true, "All 5 jobs passed" },
    job_failures   = { &["b", "a"],   AnalysisVerdict::Passed, false, "Failures: b, a" },
    analysis_fails = { &[],           AnalysisVerdict::Failed("x".to_string()), false, "Outcome analysis failed" },
)]
fn final_report_verdict(failed: &[&str], analysis: AnalysisVerdict, passed: bool, description: &str) {
    let r = report(failed, analysis);
    assert_eq!(r.passed(), passed);
    assert_eq!(r.description(), description);
}

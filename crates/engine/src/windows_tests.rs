// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use parking_lot::Mutex;

fn slugs(toolchains: &[Toolchain]) -> Vec<String> {
    toolchains.iter().map(Toolchain::slug).collect()
}

#[yare::parameterized(
    pr_head        = { RunMode::PrHead,  false, &["vs2013", "mingw"] },
    pr_head_legacy = { RunMode::PrHead,  true,  &["vs2013", "mingw"] },
    release        = { RunMode::Release, false, &["vs2013", "vs2015", "vs2017", "mingw"] },
    release_legacy = { RunMode::Release, true,  &["vs2010", "vs2013", "vs2015", "vs2017", "mingw"] },
)]
fn toolchain_selection(mode: RunMode, legacy: bool, expected: &[&str]) {
    assert_eq!(slugs(&toolchains(mode, legacy)), expected);
}

#[test]
fn mingw_has_one_degenerate_config() {
    assert_eq!(matrix(&Toolchain::Mingw), vec![WindowsTestConfig::mingw()]);
}

#[test]
fn visual_studio_gets_full_cross_product() {
    let configs = matrix(&Toolchain::vs("2015"));
    assert_eq!(configs.len(), 16);
    let unique: std::collections::HashSet<_> = configs.iter().collect();
    assert_eq!(unique.len(), 16);
    assert_eq!(configs[0].to_string(), "vs2015 Release Win32 shipped");
    assert_eq!(configs[1].to_string(), "vs2015 Release Win32 shipped retarget");
}

#[test]
fn groups_split_slow_configs() {
    let groups = work_groups(&[Toolchain::vs("2013"), Toolchain::Mingw]);
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["windows-vs2013", "windows-vs2013-debug-cmake", "windows-mingw"]);
    assert_eq!(groups[0].configs.len(), 12);
    assert_eq!(groups[1].configs.len(), 4);
    assert!(groups[1].configs.iter().all(WindowsTestConfig::is_slow));
    assert!(groups[0].configs.iter().all(|c| !c.is_slow()));
    assert_eq!(groups[2].configs, vec![WindowsTestConfig::mingw()]);
}

#[test]
fn groups_cover_the_matrix_exactly_once() {
    let chains = toolchains(RunMode::Release, true);
    let grouped: usize = work_groups(&chains).iter().map(|g| g.configs.len()).sum();
    let total: usize = chains.iter().map(|t| matrix(t).len()).sum();
    assert_eq!(grouped, total);
}

fn two_config_group() -> WorkGroup {
    WorkGroup {
        name: "windows-vs2013".to_string(),
        configs: matrix(&Toolchain::vs("2013")).into_iter().take(2).collect(),
    }
}

#[tokio::test]
async fn group_runs_every_config_and_returns_first_error() {
    let group = two_config_group();
    let ran = Mutex::new(Vec::new());
    let result = run_group(&group, |i, _config| {
        ran.lock().push(i);
        async move {
            if i == 0 {
                Err(format!("C{} failed", i + 1))
            } else {
                Ok(())
            }
        }
    })
    .await;
    assert_eq!(result, Err("C1 failed".to_string()));
    assert_eq!(*ran.lock(), vec![0, 1]);
}

#[tokio::test]
async fn later_errors_do_not_replace_the_first() {
    let group = two_config_group();
    let result = run_group(&group, |i, _| async move { Err::<(), _>(format!("C{}", i + 1)) }).await;
    assert_eq!(result, Err("C1".to_string()));
}

#[tokio::test]
async fn passing_group_is_ok() {
    let group = two_config_group();
    let result: Result<(), String> = run_group(&group, |_, _| async { Ok(()) }).await;
    assert!(result.is_ok());
}
